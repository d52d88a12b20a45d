//! Daisyworld component
//!
//! A planet covered by white daisies, black daisies and bare ground. Daisies only
//! grow within a band of local temperatures, and their albedo in turn sets the
//! planetary temperature. The coupling regulates the climate over a wide range of
//! stellar luminosities.
//!
//! # What This Component Does
//!
//! 1. For one luminosity, integrates the daisy cover fractions forward with explicit
//!    Euler steps until neither changes by more than the tolerance
//!    ([`Daisyworld::solve`])
//! 2. Repeats this over a sequence of luminosities, seeding each solve with the
//!    cover fractions found for the previous luminosity ([`Daisyworld::sweep`])
//!
//! # Physics Overview
//!
//! With cover fractions $\alpha_w$, $\alpha_b$ and bare ground
//! $\alpha_g = p - \alpha_w - \alpha_b$:
//!
//! $$A = \alpha_w a_w + \alpha_b a_b + \alpha_g a_g$$
//! $$\sigma T^4 = S L (1 - A)$$
//! $$T_i = q (A - a_i) + T$$
//! $$\beta_i = 1 - k (T_i - T_{opt,i})^2 \quad \text{for } T_{min} < T_i < T_{max}, \text{ else } 0$$
//! $$\frac{d\alpha_i}{dt} = \alpha_i (\alpha_g \beta_i - \gamma)$$
//!
//! # Numerical Behaviour
//!
//! Cover fractions are floored to a residual seed population at the start of each
//! solve but are not clamped between Euler steps. With large timesteps a fraction
//! can overshoot the habitable area within a solve.

use crate::parameters::{DaisyworldParameters, LuminositySweep};
use climod_core::config::from_toml_str;
use climod_core::constants::{kelvin_to_celsius, STEFAN_BOLTZMANN_DAISYWORLD};
use climod_core::errors::ClimodResult;
use climod_core::iteration::{FixedPoint, FixedPointSolver};
use climod_core::timeseries::FloatValue;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Surface cover of the two daisy species
///
/// Bare ground is derived from the habitable fraction, see [`CoverFractions::bare_ground`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverFractions {
    pub white: FloatValue,
    pub black: FloatValue,
}

impl Default for CoverFractions {
    fn default() -> Self {
        Self::new(0.5, 0.5)
    }
}

impl CoverFractions {
    pub fn new(white: FloatValue, black: FloatValue) -> Self {
        Self { white, black }
    }

    /// Fraction of the habitable area not covered by daisies
    pub fn bare_ground(&self, habitable_fraction: FloatValue) -> FloatValue {
        habitable_fraction - self.white - self.black
    }

    /// Raise each fraction to at least its minimum
    pub fn with_floor(self, min_white: FloatValue, min_black: FloatValue) -> Self {
        Self {
            white: if self.white < min_white {
                min_white
            } else {
                self.white
            },
            black: if self.black < min_black {
                min_black
            } else {
                self.black
            },
        }
    }
}

/// A single iterate of the equilibrium search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DaisyworldState {
    pub cover: CoverFractions,
    pub bare_ground: FloatValue,
    /// Planetary temperature (K) that drove the step producing `cover`
    pub temperature: FloatValue,
}

/// Result of an equilibrium solve at one luminosity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Equilibrium {
    pub luminosity: FloatValue,
    pub cover: CoverFractions,
    pub bare_ground: FloatValue,
    /// Planetary temperature (K)
    pub temperature: FloatValue,
    /// Number of Euler steps taken
    pub iterations: usize,
    /// False if the solve was truncated at `max_iterations`
    pub converged: bool,
}

/// Equilibria along a luminosity sweep, aligned by index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepResults {
    pub luminosity: Array1<FloatValue>,
    pub cover_white: Array1<FloatValue>,
    pub cover_black: Array1<FloatValue>,
    /// Planetary temperature (K)
    pub temperature: Array1<FloatValue>,
    pub iterations: Vec<usize>,
    pub converged: Vec<bool>,
}

impl SweepResults {
    fn from_equilibria(equilibria: &[Equilibrium]) -> Self {
        Self {
            luminosity: equilibria.iter().map(|e| e.luminosity).collect(),
            cover_white: equilibria.iter().map(|e| e.cover.white).collect(),
            cover_black: equilibria.iter().map(|e| e.cover.black).collect(),
            temperature: equilibria.iter().map(|e| e.temperature).collect(),
            iterations: equilibria.iter().map(|e| e.iterations).collect(),
            converged: equilibria.iter().map(|e| e.converged).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.luminosity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.luminosity.is_empty()
    }

    /// Planetary temperature in degrees Celsius
    pub fn temperature_celsius(&self) -> Array1<FloatValue> {
        self.temperature.mapv(kelvin_to_celsius)
    }

    /// Whether every solve in the sweep met the tolerance
    pub fn all_converged(&self) -> bool {
        self.converged.iter().all(|&c| c)
    }

    /// Cover fractions at the last luminosity, usable as the seed of a follow-on sweep
    pub fn final_cover(&self) -> Option<CoverFractions> {
        let last = self.len().checked_sub(1)?;
        Some(CoverFractions::new(
            self.cover_white[last],
            self.cover_black[last],
        ))
    }
}

/// Rate of change of a daisy cover fraction
///
/// Logistic growth limited by the available bare ground, with constant per-capita death:
/// $\alpha (\alpha_g \beta - \gamma)$
pub fn replicator_tendency(
    cover: FloatValue,
    bare_ground: FloatValue,
    birth_rate: FloatValue,
    death_rate: FloatValue,
) -> FloatValue {
    cover * (bare_ground * birth_rate - death_rate)
}

/// Explicit Euler step
pub fn euler_step(initial: FloatValue, tendency: FloatValue, timestep: FloatValue) -> FloatValue {
    initial + timestep * tendency
}

/// Two-species Daisyworld
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Daisyworld {
    parameters: DaisyworldParameters,
}

impl Default for Daisyworld {
    fn default() -> Self {
        Self::new()
    }
}

impl Daisyworld {
    /// Create a new Daisyworld with default parameters.
    pub fn new() -> Self {
        Self::from_parameters(DaisyworldParameters::default())
    }

    /// Create a new Daisyworld from parameters.
    ///
    /// Unphysical parameters are accepted and logged as warnings.
    pub fn from_parameters(parameters: DaisyworldParameters) -> Self {
        parameters.warn_unphysical();
        Self { parameters }
    }

    pub fn parameters(&self) -> &DaisyworldParameters {
        &self.parameters
    }

    /// Area-weighted planetary albedo
    pub fn planetary_albedo(&self, cover: &CoverFractions, bare_ground: FloatValue) -> FloatValue {
        cover.white * self.parameters.albedo_white
            + cover.black * self.parameters.albedo_black
            + bare_ground * self.parameters.albedo_ground
    }

    /// Planetary temperature (K) in radiative balance with the absorbed stellar flux
    pub fn planetary_temperature(&self, albedo: FloatValue, luminosity: FloatValue) -> FloatValue {
        ((self.parameters.solar_constant * luminosity * (1.0 - albedo))
            / STEFAN_BOLTZMANN_DAISYWORLD)
            .powf(0.25)
    }

    /// Local temperature (K) over a surface of the given albedo
    ///
    /// Darker surfaces than the planetary average are warmer.
    pub fn local_temperature(
        &self,
        planetary_albedo: FloatValue,
        surface_albedo: FloatValue,
        planetary_temperature: FloatValue,
    ) -> FloatValue {
        self.parameters.heat_transfer * (planetary_albedo - surface_albedo) + planetary_temperature
    }

    /// Birth rate factor for a local temperature
    ///
    /// Parabolic around `optimum` inside the open growth band, exactly zero at or
    /// beyond its bounds.
    pub fn birth_rate(&self, temperature: FloatValue, optimum: FloatValue) -> FloatValue {
        if temperature > self.parameters.min_growth_temperature
            && temperature < self.parameters.max_growth_temperature
        {
            1.0 - self.parameters.birth_rate_width * (temperature - optimum).powi(2)
        } else {
            0.0
        }
    }

    /// Starting iterate for a solve: `seed` raised to the floor, with its temperature
    pub fn initial_state(&self, seed: CoverFractions, luminosity: FloatValue) -> DaisyworldState {
        let cover = seed.with_floor(
            self.parameters.min_cover_white,
            self.parameters.min_cover_black,
        );
        let bare_ground = cover.bare_ground(self.parameters.habitable_fraction);
        let albedo = self.planetary_albedo(&cover, bare_ground);

        DaisyworldState {
            cover,
            bare_ground,
            temperature: self.planetary_temperature(albedo, luminosity),
        }
    }

    /// Advance the cover fractions by one Euler step
    ///
    /// The returned temperature is the planetary temperature of the incoming state.
    pub fn step(&self, state: &DaisyworldState, luminosity: FloatValue) -> DaisyworldState {
        let p = &self.parameters;
        let cover = state.cover;

        let albedo = self.planetary_albedo(&cover, state.bare_ground);
        let temperature = self.planetary_temperature(albedo, luminosity);

        let temperature_white = self.local_temperature(albedo, p.albedo_white, temperature);
        let temperature_black = self.local_temperature(albedo, p.albedo_black, temperature);
        let birth_white = self.birth_rate(temperature_white, p.optimum_white);
        let birth_black = self.birth_rate(temperature_black, p.optimum_black);

        let dwhite_dt =
            replicator_tendency(cover.white, state.bare_ground, birth_white, p.death_rate);
        let dblack_dt =
            replicator_tendency(cover.black, state.bare_ground, birth_black, p.death_rate);

        let cover = CoverFractions::new(
            euler_step(cover.white, dwhite_dt, p.timestep),
            euler_step(cover.black, dblack_dt, p.timestep),
        );

        DaisyworldState {
            cover,
            bare_ground: cover.bare_ground(p.habitable_fraction),
            temperature,
        }
    }

    /// Find the equilibrium at `luminosity`, starting from `seed`
    pub fn solve(&self, luminosity: FloatValue, seed: CoverFractions) -> Equilibrium {
        let problem = FixedLuminosity {
            model: self,
            luminosity,
        };
        let solver = FixedPointSolver::new(self.parameters.iteration_control());
        let solution = solver.solve(&problem, self.initial_state(seed, luminosity));
        let state = solution.state;

        if solution.converged {
            debug!(
                luminosity,
                iterations = solution.iterations,
                white = state.cover.white,
                black = state.cover.black,
                temperature = state.temperature,
                "Daisyworld equilibrium found"
            );
        } else {
            warn!(
                luminosity,
                iterations = solution.iterations,
                "Daisyworld did not converge, keeping last iterate"
            );
        }

        Equilibrium {
            luminosity,
            cover: state.cover,
            bare_ground: state.bare_ground,
            temperature: state.temperature,
            iterations: solution.iterations,
            converged: solution.converged,
        }
    }

    /// Solve at each luminosity in turn, carrying the cover fractions forward
    ///
    /// `seed` is used for the first luminosity only; every later solve starts from
    /// the previous equilibrium.
    pub fn sweep(&self, luminosities: &[FloatValue], seed: CoverFractions) -> SweepResults {
        let mut cover = seed;
        let equilibria: Vec<Equilibrium> = luminosities
            .iter()
            .map(|&luminosity| {
                let equilibrium = self.solve(luminosity, cover);
                cover = equilibrium.cover;
                equilibrium
            })
            .collect();

        debug!(
            n = equilibria.len(),
            truncated = equilibria.iter().filter(|e| !e.converged).count(),
            "Daisyworld sweep complete"
        );

        SweepResults::from_equilibria(&equilibria)
    }
}

/// Equilibrium search at a fixed luminosity
struct FixedLuminosity<'a> {
    model: &'a Daisyworld,
    luminosity: FloatValue,
}

impl FixedPoint for FixedLuminosity<'_> {
    type State = DaisyworldState;

    fn step(&self, state: &DaisyworldState) -> DaisyworldState {
        self.model.step(state, self.luminosity)
    }

    fn residual(&self, previous: &DaisyworldState, next: &DaisyworldState) -> FloatValue {
        let change_white = (next.cover.white - previous.cover.white).abs();
        let change_black = (next.cover.black - previous.cover.black).abs();
        // f64::max would hide a NaN change
        if change_white.is_nan() || change_black.is_nan() {
            FloatValue::NAN
        } else {
            change_white.max(change_black)
        }
    }
}

/// A complete luminosity sweep: model parameters, sweep definition and seed
///
/// # Examples
///
/// ```rust
/// use climod_components::components::DaisyworldExperiment;
///
/// let experiment = DaisyworldExperiment::from_toml_str(
///     r#"
///     [parameters]
///     death_rate = 0.3
///
///     [sweep]
///     start = 0.9
///     stop = 1.0
///     step = 0.01
///     "#,
/// )
/// .unwrap();
///
/// let results = experiment.run();
/// assert_eq!(results.len(), 10);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DaisyworldExperiment {
    pub parameters: DaisyworldParameters,
    pub sweep: LuminositySweep,
    pub initial_cover: CoverFractions,
}

impl DaisyworldExperiment {
    /// Read an experiment from TOML, filling missing values with defaults
    pub fn from_toml_str(contents: &str) -> ClimodResult<Self> {
        from_toml_str(contents)
    }

    pub fn run(&self) -> SweepResults {
        let model = Daisyworld::from_parameters(self.parameters.clone());
        let luminosities = self.sweep.values();
        model.sweep(&luminosities.to_vec(), self.initial_cover)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn create_component() -> Daisyworld {
        Daisyworld::new()
    }

    #[test]
    fn test_floor_clamp() {
        let cover = CoverFractions::new(0.005, 0.3).with_floor(0.01, 0.01);
        assert_eq!(cover.white, 0.01);
        assert_eq!(cover.black, 0.3);

        let cover = CoverFractions::new(0.0, 0.0).with_floor(0.01, 0.0);
        assert_eq!(cover, CoverFractions::new(0.01, 0.0));
    }

    #[test]
    fn test_initial_state_conserves_area() {
        let component = create_component();
        for seed in [
            CoverFractions::new(0.005, 0.005),
            CoverFractions::new(0.5, 0.5),
            CoverFractions::new(0.3, 0.002),
        ] {
            let state = component.initial_state(seed, 1.0);
            let total = state.cover.white + state.cover.black + state.bare_ground;
            assert!((total - 1.0).abs() < 1e-9, "total cover = {}", total);
        }
    }

    #[test]
    fn test_birth_rate_peak() {
        let component = create_component();
        assert_eq!(component.birth_rate(295.65, 295.65), 1.0);
        assert!(component.birth_rate(290.0, 295.65) < 1.0);
        assert!(component.birth_rate(300.0, 295.65) < 1.0);
    }

    #[test]
    fn test_birth_rate_cutoff() {
        let component = create_component();
        for temperature in [200.0, 278.0, 278.15, 313.15, 313.2, 400.0] {
            assert_eq!(
                component.birth_rate(temperature, 295.65),
                0.0,
                "birth rate at {} K",
                temperature
            );
        }
        assert!(component.birth_rate(278.2, 295.65) > 0.0);
        assert!(component.birth_rate(313.1, 295.65) > 0.0);
    }

    #[test]
    fn test_local_temperature() {
        let component = create_component();
        // Darker than average is warmer, brighter is cooler
        assert_relative_eq!(component.local_temperature(0.5, 0.25, 290.0), 297.5);
        assert_relative_eq!(component.local_temperature(0.5, 0.75, 290.0), 282.5);
    }

    #[test]
    fn test_planetary_temperature() {
        let component = create_component();
        // Bare planet, albedo 0.5: (1000 * 0.5 / sigma)^(1/4)
        let expected = (500.0 / STEFAN_BOLTZMANN_DAISYWORLD).powf(0.25);
        assert_relative_eq!(component.planetary_temperature(0.5, 1.0), expected);
        assert!(component.planetary_temperature(0.5, 1.2) > expected);
    }

    #[test]
    fn test_replicator_tendency() {
        assert_relative_eq!(replicator_tendency(0.2, 0.5, 1.0, 0.3), 0.04, epsilon = 1e-12);
        assert_relative_eq!(replicator_tendency(0.2, 0.5, 0.0, 0.3), -0.06, epsilon = 1e-12);
        assert_eq!(replicator_tendency(0.0, 0.5, 1.0, 0.3), 0.0);
        assert_relative_eq!(euler_step(0.2, 0.04, 1.0), 0.24, epsilon = 1e-12);
    }

    #[test]
    fn test_step_does_not_clamp() {
        let component = Daisyworld::from_parameters(DaisyworldParameters {
            timestep: 20.0,
            ..Default::default()
        });
        let state = component.initial_state(CoverFractions::new(0.1, 0.01), 1.0);
        let next = component.step(&state, 1.0);

        assert!(next.cover.white > 1.0, "white = {}", next.cover.white);
        assert!(next.cover.black < 0.0, "black = {}", next.cover.black);
        assert!(next.bare_ground < 0.0);
        assert_relative_eq!(
            next.cover.white + next.cover.black + next.bare_ground,
            1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_solve_reference_case() {
        let component = create_component();
        let equilibrium = component.solve(1.0, CoverFractions::new(0.5, 0.5));

        assert!(equilibrium.converged);
        assert_eq!(equilibrium.iterations, 39);
        assert_relative_eq!(equilibrium.cover.white, 0.4778622311293945, epsilon = 1e-9);
        assert_relative_eq!(equilibrium.cover.black, 0.15464807715039508, epsilon = 1e-9);
        assert_relative_eq!(equilibrium.temperature, 293.2260674725069, epsilon = 1e-6);
    }

    #[test]
    fn test_equilibrium_is_stationary() {
        let component = create_component();
        let first = component.solve(1.0, CoverFractions::default());
        let second = component.solve(1.0, first.cover);

        assert!(second.converged);
        assert_eq!(second.iterations, 1);
        assert!((second.cover.white - first.cover.white).abs() <= 1e-6);
        assert!((second.cover.black - first.cover.black).abs() <= 1e-6);
    }

    #[test]
    fn test_truncated_solve() {
        let component = Daisyworld::from_parameters(DaisyworldParameters {
            max_iterations: 5,
            ..Default::default()
        });
        let equilibrium = component.solve(1.0, CoverFractions::default());

        assert!(!equilibrium.converged);
        assert_eq!(equilibrium.iterations, 5);
        assert!(equilibrium.cover.white.is_finite());
    }

    #[test]
    fn test_zero_iterations_reports_seed() {
        let component = Daisyworld::from_parameters(DaisyworldParameters {
            max_iterations: 0,
            ..Default::default()
        });
        let equilibrium = component.solve(1.0, CoverFractions::new(0.005, 0.4));

        assert!(!equilibrium.converged);
        assert_eq!(equilibrium.cover, CoverFractions::new(0.01, 0.4));
        assert!(equilibrium.temperature > 0.0);
    }

    #[test]
    fn test_sweep_carries_cover_forward() {
        let component = create_component();
        let results = component.sweep(&[1.0, 1.0], CoverFractions::default());

        assert_eq!(results.len(), 2);
        // The second solve starts at the first equilibrium and settles immediately
        assert_eq!(results.iterations, vec![39, 1]);
        assert_eq!(
            results.final_cover().map(|c| c.white > 0.4),
            Some(true)
        );
    }

    #[test]
    fn test_empty_sweep() {
        let results = create_component().sweep(&[], CoverFractions::default());
        assert!(results.is_empty());
        assert!(results.all_converged());
        assert_eq!(results.final_cover(), None);
    }

    #[test]
    fn test_temperature_celsius() {
        let results = create_component().sweep(&[1.0], CoverFractions::default());
        assert_relative_eq!(
            results.temperature_celsius()[0],
            results.temperature[0] - 273.15
        );
    }

    #[test]
    fn test_experiment_defaults() {
        let experiment = DaisyworldExperiment::from_toml_str("").unwrap();

        assert_eq!(experiment.initial_cover, CoverFractions::new(0.5, 0.5));
        assert_eq!(experiment.sweep.values().len(), 550);
        assert_eq!(experiment.parameters.max_iterations, 1000);
    }

    #[test]
    fn test_experiment_from_toml() {
        let experiment = DaisyworldExperiment::from_toml_str(
            r#"
            initial_cover = { white = 0.2, black = 0.0 }

            [parameters]
            min_cover_black = 0.0

            [sweep]
            start = 1.0
            stop = 1.09
            step = 0.05
            "#,
        )
        .unwrap();

        let results = experiment.run();
        assert_eq!(results.len(), 2);
        assert!(results.cover_black.iter().all(|&b| b == 0.0));
        assert!(results.cover_white[0] > 0.1);
    }
}
