//! Physical constants and reference values.
//!
//! The two Stefan-Boltzmann values differ in their last digits. Each model
//! keeps the value its reference results were produced with.

use crate::timeseries::FloatValue;

// -- Radiation --

/// Stefan-Boltzmann constant used by Daisyworld (W m^-2 K^-4).
pub const STEFAN_BOLTZMANN_DAISYWORLD: FloatValue = 5.67032e-8;

/// Stefan-Boltzmann constant used by the radiative-convective column (W m^-2 K^-4).
pub const STEFAN_BOLTZMANN: FloatValue = 5.670367e-8;

// -- Thermodynamics --

/// Offset between degrees Celsius and Kelvin.
pub const CELSIUS_TO_KELVIN: FloatValue = 273.15;

/// Acceleration due to gravity (m s^-2).
pub const GRAVITY: FloatValue = 9.8;

/// Specific heat of dry air at constant pressure (J kg^-1 K^-1).
pub const SPECIFIC_HEAT_DRY_AIR: FloatValue = 1000.0;

// -- Gridded data --

/// Values at or below this threshold are treated as missing in gridded SST data.
pub const FILL_VALUE_THRESHOLD: FloatValue = -1000.0;

/// Convert a temperature from Kelvin to degrees Celsius
pub fn kelvin_to_celsius(temperature: FloatValue) -> FloatValue {
    temperature - CELSIUS_TO_KELVIN
}

/// Convert a temperature from degrees Celsius to Kelvin
pub fn celsius_to_kelvin(temperature: FloatValue) -> FloatValue {
    temperature + CELSIUS_TO_KELVIN
}
