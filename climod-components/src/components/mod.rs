mod daisyworld;
mod radiative_convective;

pub use daisyworld::{
    euler_step, replicator_tendency, CoverFractions, Daisyworld, DaisyworldExperiment,
    DaisyworldState, Equilibrium, SweepResults,
};
pub use radiative_convective::{ColumnEquilibrium, ColumnState, RadiativeConvective};
