//! Daisyworld Parameters
//!
//! Parameters for the two-species Daisyworld model of Watson and Lovelock (1983)
//! in the simplified form reviewed by Wood et al. (2008).

use climod_core::iteration::IterationControl;
use climod_core::ranges::evenly_spaced;
use climod_core::timeseries::FloatValue;
use ndarray::{s, Array1};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Parameters for the Daisyworld equilibrium solver.
///
/// # Default Values
///
/// Defaults reproduce the reference configuration: equal optimum temperatures for
/// both species, white daisies brighter and black daisies darker than bare ground.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DaisyworldParameters {
    // Surface albedos
    /// Albedo of white daisies (dimensionless).
    /// Default: 0.75
    pub albedo_white: FloatValue,

    /// Albedo of black daisies (dimensionless).
    /// Default: 0.25
    pub albedo_black: FloatValue,

    /// Albedo of bare ground (dimensionless).
    /// Default: 0.5
    pub albedo_ground: FloatValue,

    // Population dynamics
    /// Per-capita death rate $\gamma$ (per unit time).
    /// Default: 0.3
    pub death_rate: FloatValue,

    /// Fraction of the planet surface that is habitable, $p$.
    /// White, black and bare ground cover always sum to this value.
    /// Default: 1.0
    pub habitable_fraction: FloatValue,

    /// Smallest cover fraction of white daisies at the start of each solve.
    /// Models a residual seed population. Setting it to 0 lets white daisies go extinct.
    /// Default: 0.01
    pub min_cover_white: FloatValue,

    /// Smallest cover fraction of black daisies at the start of each solve.
    /// Default: 0.01
    pub min_cover_black: FloatValue,

    // Radiation
    /// Incident solar flux (W/m^2), scaled by the normalised luminosity.
    /// Default: 1000.0
    pub solar_constant: FloatValue,

    /// Heat transfer coefficient $q$ between planetary and local temperature (K).
    /// Default: 30.0
    pub heat_transfer: FloatValue,

    // Birth rate
    /// Optimum growth temperature of white daisies (K).
    /// Default: 295.65
    pub optimum_white: FloatValue,

    /// Optimum growth temperature of black daisies (K).
    /// Default: 295.65
    pub optimum_black: FloatValue,

    /// Local temperature at or below which daisies cannot grow (K).
    /// Default: 278.15
    pub min_growth_temperature: FloatValue,

    /// Local temperature at or above which daisies cannot grow (K).
    /// Default: 313.15
    pub max_growth_temperature: FloatValue,

    /// Quadratic width $k$ of the birth rate parabola (1/K^2).
    /// Default: 0.003265
    pub birth_rate_width: FloatValue,

    // Integration
    /// Explicit Euler timestep $h$.
    /// Default: 1.0
    pub timestep: FloatValue,

    /// Largest change of either cover fraction accepted as converged.
    /// Default: 1e-6
    pub tolerance: FloatValue,

    /// Number of Euler steps after which a solve is truncated.
    /// Default: 1000
    pub max_iterations: usize,
}

impl Default for DaisyworldParameters {
    fn default() -> Self {
        Self {
            // Albedos
            albedo_white: 0.75,
            albedo_black: 0.25,
            albedo_ground: 0.5,

            // Population
            death_rate: 0.3,
            habitable_fraction: 1.0,
            min_cover_white: 0.01,
            min_cover_black: 0.01,

            // Radiation
            solar_constant: 1000.0,
            heat_transfer: 30.0,

            // Birth rate
            optimum_white: 295.65,
            optimum_black: 295.65,
            min_growth_temperature: 278.15,
            max_growth_temperature: 313.15,
            birth_rate_width: 0.003265,

            // Integration
            timestep: 1.0,
            tolerance: 1e-6,
            max_iterations: 1000,
        }
    }
}

impl DaisyworldParameters {
    /// Termination policy for each equilibrium solve
    pub fn iteration_control(&self) -> IterationControl {
        IterationControl::new(self.tolerance, self.max_iterations)
    }

    /// Log a warning for every parameter outside its physical range.
    ///
    /// Unphysical configurations are still run; the output is whatever the
    /// equations produce. Returns the number of warnings emitted.
    pub fn warn_unphysical(&self) -> usize {
        let mut warnings = 0;

        for (name, albedo) in [
            ("albedo_white", self.albedo_white),
            ("albedo_black", self.albedo_black),
            ("albedo_ground", self.albedo_ground),
        ] {
            if !(0.0..=1.0).contains(&albedo) {
                warn!(parameter = name, value = albedo, "Albedo outside [0, 1]");
                warnings += 1;
            }
        }
        if self.habitable_fraction < 0.0 {
            warn!(
                value = self.habitable_fraction,
                "Negative habitable fraction"
            );
            warnings += 1;
        }
        if self.tolerance <= 0.0 {
            warn!(
                value = self.tolerance,
                "Non-positive tolerance, solves will only stop at max_iterations"
            );
            warnings += 1;
        }
        if self.timestep <= 0.0 {
            warn!(
                value = self.timestep,
                "Non-positive timestep, cover fractions will not move towards equilibrium"
            );
            warnings += 1;
        }
        if self.min_growth_temperature >= self.max_growth_temperature {
            warn!(
                min = self.min_growth_temperature,
                max = self.max_growth_temperature,
                "Empty growth temperature band, daisies can never grow"
            );
            warnings += 1;
        }

        warnings
    }
}

/// Evenly spaced sequence of normalised stellar luminosities.
///
/// Values run from `start` up to, but excluding, `stop`. A descending sweep visits
/// the same values in reverse order, which traces the other equilibrium branch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LuminositySweep {
    /// First luminosity of the ascending sequence.
    /// Default: 0.5
    pub start: FloatValue,

    /// Exclusive upper bound of the ascending sequence.
    /// Default: 1.6
    pub stop: FloatValue,

    /// Spacing between luminosities.
    /// Default: 0.002
    pub step: FloatValue,

    /// Visit the luminosities from high to low.
    /// Default: false
    pub descending: bool,
}

impl Default for LuminositySweep {
    fn default() -> Self {
        Self {
            start: 0.5,
            stop: 1.6,
            step: 0.002,
            descending: false,
        }
    }
}

impl LuminositySweep {
    /// Luminosities in the order they are visited
    pub fn values(&self) -> Array1<FloatValue> {
        let ascending = evenly_spaced(self.start, self.stop, self.step);
        if self.descending {
            ascending.slice(s![..;-1]).to_owned()
        } else {
            ascending
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parameters() {
        let params = DaisyworldParameters::default();

        assert!((params.albedo_white - 0.75).abs() < 1e-10);
        assert!((params.albedo_black - 0.25).abs() < 1e-10);
        assert!((params.death_rate - 0.3).abs() < 1e-10);
        assert_eq!(params.max_iterations, 1000);
        assert_eq!(params.warn_unphysical(), 0);
    }

    #[test]
    fn test_iteration_control() {
        let control = DaisyworldParameters::default().iteration_control();
        assert_eq!(control.max_iterations, 1000);
        assert!((control.tolerance - 1e-6).abs() < 1e-15);
    }

    #[test]
    fn test_warn_unphysical() {
        let params = DaisyworldParameters {
            albedo_white: 1.2,
            habitable_fraction: -0.5,
            tolerance: 0.0,
            ..Default::default()
        };
        assert_eq!(params.warn_unphysical(), 3);

        let params = DaisyworldParameters {
            timestep: 0.0,
            ..Default::default()
        };
        assert_eq!(params.warn_unphysical(), 1);

        let params = DaisyworldParameters {
            timestep: -1.0,
            min_growth_temperature: 320.0,
            ..Default::default()
        };
        assert_eq!(params.warn_unphysical(), 2);
    }

    #[test]
    fn test_default_sweep() {
        let values = LuminositySweep::default().values();

        assert_eq!(values.len(), 550);
        assert_eq!(values[0], 0.5);
        assert!((values[549] - 1.598).abs() < 1e-12);
    }

    #[test]
    fn test_descending_sweep() {
        let sweep = LuminositySweep {
            start: 0.5,
            stop: 0.6,
            step: 0.05,
            descending: true,
        };
        assert_eq!(sweep.values().to_vec(), vec![0.55, 0.5]);
    }

    #[test]
    fn test_degenerate_sweep_is_empty() {
        let zero_step = LuminositySweep {
            step: 0.0,
            ..Default::default()
        };
        assert!(zero_step.values().is_empty());

        let wrong_sign = LuminositySweep {
            step: -0.1,
            descending: true,
            ..Default::default()
        };
        assert!(wrong_sign.values().is_empty());
    }

    #[test]
    fn test_partial_deserialization() {
        let json = r#"{"death_rate": 0.9, "optimum_white": 300.0}"#;
        let params: DaisyworldParameters =
            serde_json::from_str(json).expect("Partial deserialization failed");

        assert!((params.death_rate - 0.9).abs() < 1e-10);
        assert!((params.optimum_white - 300.0).abs() < 1e-10);
        // Untouched fields keep their defaults
        assert!((params.optimum_black - 295.65).abs() < 1e-10);
        assert_eq!(params.max_iterations, 1000);
    }
}
