//! Fixed-point iteration
//!
//! Models that search for an equilibrium by repeatedly applying an update rule
//! implement [`FixedPoint`]. The [`FixedPointSolver`] drives the update until the
//! change between successive iterates falls within a tolerance, or until an
//! iteration cap is reached.
//!
//! Reaching the cap is not an error. The last iterate is returned as the answer
//! and the [`Solution::converged`] flag records that the tolerance was never met.

use crate::timeseries::FloatValue;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// An update rule whose repeated application approaches an equilibrium
pub trait FixedPoint {
    type State: Clone + std::fmt::Debug;

    /// Apply a single update to `state`
    fn step(&self, state: &Self::State) -> Self::State;

    /// Size of the change between two successive iterates
    ///
    /// The iteration is considered converged once this is at or below the tolerance.
    /// For multi-variable states this should be the largest absolute change of any
    /// tracked variable so that every variable must settle.
    fn residual(&self, previous: &Self::State, next: &Self::State) -> FloatValue;
}

/// Termination policy for a fixed-point iteration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IterationControl {
    /// Largest residual accepted as converged
    pub tolerance: FloatValue,
    /// Maximum number of updates before the iteration is truncated
    pub max_iterations: usize,
}

impl IterationControl {
    pub fn new(tolerance: FloatValue, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }
}

/// Outcome of a fixed-point iteration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution<S> {
    /// Final iterate
    pub state: S,
    /// Number of updates applied
    pub iterations: usize,
    /// Whether the residual of the last update was within tolerance
    pub converged: bool,
}

/// Drives a [`FixedPoint`] problem until convergence or truncation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedPointSolver {
    control: IterationControl,
}

impl FixedPointSolver {
    pub fn new(control: IterationControl) -> Self {
        Self { control }
    }

    pub fn control(&self) -> IterationControl {
        self.control
    }

    /// Iterate from `initial` until converged or the iteration cap is hit
    pub fn solve<P: FixedPoint>(&self, problem: &P, initial: P::State) -> Solution<P::State> {
        self.solve_observed(problem, initial, |_| {})
    }

    /// Iterate from `initial`, also returning every state an update was applied to
    ///
    /// The history starts with `initial` and has one entry per update, so the final
    /// state is not included.
    pub fn solve_with_history<P: FixedPoint>(
        &self,
        problem: &P,
        initial: P::State,
    ) -> (Solution<P::State>, Vec<P::State>) {
        let mut history = Vec::new();
        let solution = self.solve_observed(problem, initial, |state| history.push(state.clone()));
        (solution, history)
    }

    fn solve_observed<P, F>(
        &self,
        problem: &P,
        initial: P::State,
        mut observe: F,
    ) -> Solution<P::State>
    where
        P: FixedPoint,
        F: FnMut(&P::State),
    {
        let mut state = initial;
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.control.max_iterations {
            observe(&state);
            let next = problem.step(&state);
            let residual = problem.residual(&state, &next);
            state = next;
            iterations += 1;

            if residual <= self.control.tolerance {
                converged = true;
                break;
            }
        }

        if !converged {
            debug!(
                max_iterations = self.control.max_iterations,
                tolerance = self.control.tolerance,
                "Fixed-point iteration truncated before converging"
            );
        }

        Solution {
            state,
            iterations,
            converged,
        }
    }
}
