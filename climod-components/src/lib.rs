//! Conceptual climate models built on `climod-core`
//!
//! - `components::Daisyworld`: two-species albedo feedback model with luminosity sweeps
//! - `components::RadiativeConvective`: single-column model of a dry troposphere
//!
//! # Parameters
//!
//! Each model has an associated parameters struct in the `parameters` module
//! with defaults matching the reference configuration.

pub mod components;
pub mod parameters;
