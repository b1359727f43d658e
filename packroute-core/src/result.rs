//! Outputs of an optimization run.

use crate::RouteSummary;

/// Best fitness observed when a given iteration completed.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConvergenceSample {
    /// Completed iteration (`0` is the initial pack).
    pub iteration: u32,
    /// Alpha fitness at that point.
    pub best_fitness: f64,
}

impl ConvergenceSample {
    /// Construct a sample.
    #[must_use]
    pub const fn new(iteration: u32, best_fitness: f64) -> Self {
        Self {
            iteration,
            best_fitness,
        }
    }
}

/// Final (or best-so-far) solution of a run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizationResult {
    /// Depot-bounded customer id sequences, one per vehicle.
    pub routes: Vec<Vec<u64>>,
    /// Fitness of `routes`.
    pub best_fitness: f64,
    /// Samples in increasing iteration order.
    pub convergence_history: Vec<ConvergenceSample>,
    /// Wall-clock time spent, in seconds.
    pub runtime_seconds: f64,
    /// Distance and load per route.
    pub route_details: Vec<RouteSummary>,
    /// Iterations actually performed.
    pub iterations_completed: u32,
}

impl OptimizationResult {
    /// Number of vehicles used.
    #[must_use]
    pub fn vehicle_count(&self) -> usize {
        self.routes.len()
    }

    /// Sum of route distances, ignoring penalties.
    #[must_use]
    pub fn total_distance(&self) -> f64 {
        self.route_details.iter().map(|detail| detail.distance).sum()
    }
}
