//! Radiative-convective column
//!
//! Single column model of a dry troposphere. The atmosphere is well mixed and
//! convection is instantaneous, so the temperature profile always follows the dry
//! adiabat from the surface.
//!
//! Each update:
//!
//! 1. absorbed shortwave at the surface $SW = S_0 (1 - a) / 4$
//! 2. downwelling longwave from the atmosphere $LW = \sigma T_e^4$
//! 3. surface temperature from $\sigma T_s^4 = SW + LW$
//! 4. profile $T(z) = T_s - \Gamma z$ with $\Gamma = g / c_p$
//! 5. new emission temperature $T_e$ = mean of the profile
//!
//! The iteration stops once the surface temperature changes by no more than the
//! tolerance between updates.

use crate::parameters::RadiativeConvectiveParameters;
use climod_core::constants::kelvin_to_celsius;
use climod_core::iteration::{FixedPoint, FixedPointSolver};
use climod_core::timeseries::FloatValue;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Column temperatures between updates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnState {
    /// Surface temperature (K)
    pub surface_temperature: FloatValue,
    /// Emission temperature of the atmosphere (K)
    pub emission_temperature: FloatValue,
}

/// Converged (or truncated) column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnEquilibrium {
    /// Surface temperature (K)
    pub surface_temperature: FloatValue,
    /// Emission temperature of the atmosphere (K)
    pub emission_temperature: FloatValue,
    /// Heights of the model levels (m)
    pub heights: Array1<FloatValue>,
    /// Temperature at each model level (K)
    pub profile: Array1<FloatValue>,
    /// Surface temperature (degC) before each update
    pub surface_history: Array1<FloatValue>,
    pub iterations: usize,
    pub converged: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadiativeConvective {
    parameters: RadiativeConvectiveParameters,
}

impl Default for RadiativeConvective {
    fn default() -> Self {
        Self::new()
    }
}

impl RadiativeConvective {
    /// Create a new column with default parameters.
    pub fn new() -> Self {
        Self::from_parameters(RadiativeConvectiveParameters::default())
    }

    /// Create a new column from parameters.
    pub fn from_parameters(parameters: RadiativeConvectiveParameters) -> Self {
        if parameters.heights().is_empty() {
            warn!(
                bottom = parameters.level_bottom,
                top = parameters.level_top,
                "Column has no levels, emission temperature will be NaN"
            );
        }
        Self { parameters }
    }

    pub fn parameters(&self) -> &RadiativeConvectiveParameters {
        &self.parameters
    }

    /// Shortwave radiation absorbed at the surface (W/m^2)
    pub fn surface_shortwave(&self) -> FloatValue {
        self.parameters.solar_irradiance * (1.0 - self.parameters.albedo) / 4.0
    }

    /// Longwave radiation emitted down by the atmosphere (W/m^2)
    pub fn surface_longwave(&self, emission_temperature: FloatValue) -> FloatValue {
        self.parameters.stefan_boltzmann * emission_temperature.powi(4)
    }

    /// Surface temperature (K) balancing the incoming radiation
    pub fn surface_temperature(&self, shortwave: FloatValue, longwave: FloatValue) -> FloatValue {
        ((shortwave + longwave) / self.parameters.stefan_boltzmann).powf(0.25)
    }

    /// Temperature (K) at each level after convective adjustment
    pub fn convective_profile(&self, surface_temperature: FloatValue) -> Array1<FloatValue> {
        let lapse_rate = self.parameters.lapse_rate();
        self.parameters
            .heights()
            .mapv(|z| surface_temperature - lapse_rate * z)
    }

    fn initial_state(&self) -> ColumnState {
        ColumnState {
            surface_temperature: self.parameters.initial_surface_temperature,
            emission_temperature: self.parameters.initial_emission_temperature,
        }
    }

    /// Iterate the column to radiative-convective equilibrium
    pub fn solve(&self) -> ColumnEquilibrium {
        let solver = FixedPointSolver::new(self.parameters.iteration_control());
        let (solution, history) = solver.solve_with_history(self, self.initial_state());
        let state = solution.state;

        if solution.converged {
            debug!(
                iterations = solution.iterations,
                surface_temperature = state.surface_temperature,
                "Column equilibrium found"
            );
        } else {
            warn!(
                iterations = solution.iterations,
                "Column did not converge, keeping last iterate"
            );
        }

        ColumnEquilibrium {
            surface_temperature: state.surface_temperature,
            emission_temperature: state.emission_temperature,
            heights: self.parameters.heights(),
            profile: self.convective_profile(state.surface_temperature),
            surface_history: history
                .iter()
                .map(|s| kelvin_to_celsius(s.surface_temperature))
                .collect(),
            iterations: solution.iterations,
            converged: solution.converged,
        }
    }
}

impl FixedPoint for RadiativeConvective {
    type State = ColumnState;

    fn step(&self, state: &ColumnState) -> ColumnState {
        let shortwave = self.surface_shortwave();
        let longwave = self.surface_longwave(state.emission_temperature);
        let surface_temperature = self.surface_temperature(shortwave, longwave);
        let emission_temperature = self
            .convective_profile(surface_temperature)
            .mean()
            .unwrap_or(FloatValue::NAN);

        ColumnState {
            surface_temperature,
            emission_temperature,
        }
    }

    fn residual(&self, previous: &ColumnState, next: &ColumnState) -> FloatValue {
        (previous.surface_temperature - next.surface_temperature).abs()
    }
}
