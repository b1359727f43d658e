use thiserror::Error;

use crate::{ConfigError, Instance, InstanceError, OptimizationConfig, OptimizationResult};

/// Errors returned by [`Optimizer::optimize`].
///
/// Both variants are raised before the first iteration; no partial result
/// exists when they occur.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptimizeError {
    /// The instance is malformed or infeasible.
    #[error("invalid instance: {0}")]
    InvalidInstance(#[from] InstanceError),
    /// The search parameters are unusable.
    #[error("invalid config: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// Validate an instance/config pair before a run.
///
/// # Errors
///
/// Returns [`OptimizeError::InvalidConfig`] first, then
/// [`OptimizeError::InvalidInstance`] when a customer cannot fit into any
/// vehicle.
pub fn validate_run(
    instance: &Instance,
    config: &OptimizationConfig,
) -> Result<(), OptimizeError> {
    config.validate()?;
    instance.check_feasible()?;
    Ok(())
}

/// Solve a CVRP instance to completion.
///
/// Implementations must return an [`OptimizeError`] for invalid input rather
/// than panicking, and must be `Send + Sync` so one optimizer can serve jobs
/// on several threads.
///
/// # Examples
///
/// ```rust
/// use packroute_core::{
///     Instance, OptimizationConfig, OptimizationResult, OptimizeError, Optimizer,
/// };
///
/// struct Trivial;
///
/// impl Optimizer for Trivial {
///     fn optimize(
///         &self,
///         instance: &Instance,
///         config: &OptimizationConfig,
///     ) -> Result<OptimizationResult, OptimizeError> {
///         packroute_core::validate_run(instance, config)?;
///         Ok(OptimizationResult {
///             routes: Vec::new(),
///             best_fitness: 0.0,
///             convergence_history: Vec::new(),
///             runtime_seconds: 0.0,
///             route_details: Vec::new(),
///             iterations_completed: 0,
///         })
///     }
/// }
/// ```
pub trait Optimizer: Send + Sync {
    /// Run a search and return the best solution found.
    fn optimize(
        &self,
        instance: &Instance,
        config: &OptimizationConfig,
    ) -> Result<OptimizationResult, OptimizeError>;
}
