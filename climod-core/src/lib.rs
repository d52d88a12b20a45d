//! Core types and numerics shared by the climod models
//!
//! - [`iteration`]: fixed-point iteration with an explicit convergence flag
//! - [`ranges`]: evenly spaced coordinates that never panic on a bad step
//! - [`config`]: TOML loading for parameter structs
//! - [`statistics`]: descriptive statistics over small samples
//! - [`spatial`]: region and time-window selection on gridded fields

pub mod config;
pub mod constants;
pub mod errors;
pub mod iteration;
pub mod ranges;
pub mod spatial;
pub mod statistics;
pub mod timeseries;
