//! Model parameters
//!
//! Each parameter struct provides defaults matching the reference configuration
//! and accepts partial configurations through `#[serde(default)]`.

mod daisyworld;
mod radiative_convective;

pub use daisyworld::{DaisyworldParameters, LuminositySweep};
pub use radiative_convective::RadiativeConvectiveParameters;
