//! Small conceptual climate models
//!
//! Re-exports the modules of the workspace crates under one name:
//!
//! - from `climod-core`: fixed-point iteration, statistics, gridded field selection
//! - from `climod-components`: Daisyworld and the radiative-convective column
//!
//! # Examples
//!
//! ```rust
//! use climod::components::{CoverFractions, Daisyworld};
//!
//! let equilibrium = Daisyworld::new().solve(1.0, CoverFractions::default());
//! assert!(equilibrium.converged);
//! ```

pub use climod_components::{components, parameters};
pub use climod_core::{config, constants, errors, iteration, spatial, statistics, timeseries};

pub mod prelude {
    pub use climod_components::components::{
        CoverFractions, Daisyworld, DaisyworldExperiment, RadiativeConvective, SweepResults,
    };
    pub use climod_components::parameters::{
        DaisyworldParameters, LuminositySweep, RadiativeConvectiveParameters,
    };
    pub use climod_core::errors::{ClimodError, ClimodResult};
    pub use climod_core::timeseries::FloatValue;
}
