//! Scalar types used throughout the models

/// Floating point type used for all physical quantities
pub type FloatValue = f64;

/// Time expressed as a decimal year (e.g. `1971.0417` for mid January 1971)
pub type Time = f64;
