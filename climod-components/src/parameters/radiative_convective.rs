//! Radiative-Convective Column Parameters
//!
//! Parameters for a single-column model of a dry, well-mixed troposphere in which
//! convection adjusts the profile to the dry adiabat instantaneously.

use climod_core::constants::{
    celsius_to_kelvin, GRAVITY, SPECIFIC_HEAT_DRY_AIR, STEFAN_BOLTZMANN,
};
use climod_core::iteration::IterationControl;
use climod_core::ranges::evenly_spaced;
use climod_core::timeseries::FloatValue;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Parameters for the radiative-convective column.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RadiativeConvectiveParameters {
    /// Solar irradiance at the top of the atmosphere (W/m^2).
    /// Default: 1360.0
    pub solar_irradiance: FloatValue,

    /// Surface albedo (dimensionless).
    /// Default: 0.4
    pub albedo: FloatValue,

    /// Stefan-Boltzmann constant (W m^-2 K^-4).
    /// Default: 5.670367e-8
    pub stefan_boltzmann: FloatValue,

    /// Acceleration due to gravity (m/s^2).
    /// Default: 9.8
    pub gravity: FloatValue,

    /// Specific heat of dry air (J/(kg K)).
    /// Default: 1000.0
    pub specific_heat: FloatValue,

    /// Lowest model level (m).
    /// Default: 100.0
    pub level_bottom: FloatValue,

    /// Upper bound of the model levels, exclusive (m).
    /// Default: 10000.0
    pub level_top: FloatValue,

    /// Spacing between model levels (m).
    /// Default: 100.0
    pub level_spacing: FloatValue,

    /// Initial surface temperature (K).
    /// Default: 323.15 (50 degC)
    pub initial_surface_temperature: FloatValue,

    /// Initial emission temperature of the atmosphere (K).
    /// Default: 323.15 (50 degC)
    pub initial_emission_temperature: FloatValue,

    /// Largest change in surface temperature accepted as converged (K).
    /// Default: 1e-4
    pub tolerance: FloatValue,

    /// Number of updates after which the iteration is truncated.
    /// Default: 70
    pub max_iterations: usize,
}

impl Default for RadiativeConvectiveParameters {
    fn default() -> Self {
        Self {
            solar_irradiance: 1360.0,
            albedo: 0.4,
            stefan_boltzmann: STEFAN_BOLTZMANN,
            gravity: GRAVITY,
            specific_heat: SPECIFIC_HEAT_DRY_AIR,
            level_bottom: 100.0,
            level_top: 10000.0,
            level_spacing: 100.0,
            initial_surface_temperature: celsius_to_kelvin(50.0),
            initial_emission_temperature: celsius_to_kelvin(50.0),
            tolerance: 1e-4,
            max_iterations: 70,
        }
    }
}

impl RadiativeConvectiveParameters {
    /// Dry adiabatic lapse rate $\Gamma = g / c_p$ (K/m).
    pub fn lapse_rate(&self) -> FloatValue {
        self.gravity / self.specific_heat
    }

    /// Heights of the model levels (m), bottom first.
    pub fn heights(&self) -> Array1<FloatValue> {
        evenly_spaced(self.level_bottom, self.level_top, self.level_spacing)
    }

    /// Termination policy for the column iteration
    pub fn iteration_control(&self) -> IterationControl {
        IterationControl::new(self.tolerance, self.max_iterations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parameters() {
        let params = RadiativeConvectiveParameters::default();

        assert!((params.initial_surface_temperature - 323.15).abs() < 1e-10);
        assert_eq!(params.max_iterations, 70);
        // 9.8 K/km
        assert!((params.lapse_rate() - 0.0098).abs() < 1e-12);
    }

    #[test]
    fn test_heights() {
        let heights = RadiativeConvectiveParameters::default().heights();

        assert_eq!(heights.len(), 99);
        assert_eq!(heights[0], 100.0);
        assert_eq!(heights[98], 9900.0);
    }

    #[test]
    fn test_degenerate_levels_are_empty() {
        let params = RadiativeConvectiveParameters {
            level_spacing: -100.0,
            ..Default::default()
        };
        assert!(params.heights().is_empty());
    }

    #[test]
    fn test_serialization() {
        let params = RadiativeConvectiveParameters::default();
        let json = serde_json::to_string(&params).expect("Serialization failed");
        let parsed: RadiativeConvectiveParameters =
            serde_json::from_str(&json).expect("Deserialization failed");

        assert_eq!(params.max_iterations, parsed.max_iterations);
        assert!((params.albedo - parsed.albedo).abs() < 1e-10);
    }
}
