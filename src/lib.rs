//! Facade crate for the packroute vehicle routing optimizer.
//!
//! This crate re-exports the core domain types and exposes the Grey Wolf
//! solver and the job executor behind feature flags.
//!
//! ```
//! # #[cfg(feature = "jobs")]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use packroute::{Customer, Instance, Location, OptimizationConfig};
//!
//! let instance = Instance::builder(Location::depot(0.0, 0.0), 30)
//!     .customer(Customer::new(1, 0.0, 1.0, 20))
//!     .customer(Customer::new(2, 1.0, 0.0, 20))
//!     .build()?;
//! let result = packroute::run_sync(&instance, &OptimizationConfig::default())?;
//! assert_eq!(result.routes.len(), 2);
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "jobs"))]
//! # fn main() {}
//! ```

#![forbid(unsafe_code)]

pub use packroute_core::{
    ConfigError, ConvergenceSample, Customer, DEFAULT_PENALTY_COEFFICIENT, DEPOT_ID,
    DistanceMatrix, DistanceMetric, Instance, InstanceBuilder, InstanceError, Location,
    MIN_POPULATION_SIZE, OptimizationConfig, OptimizationResult, OptimizeError, Optimizer,
    RandomKeyCodec, Route, RouteSummary, SearchSpace, SolutionCodec, baseline, fitness, synthetic,
};

#[cfg(feature = "solver-gwo")]
pub use packroute_solver_gwo::{EngineState, GwoEngine, GwoSolver, Leaders, Pack, Step, Wolf};

#[cfg(feature = "jobs")]
pub use packroute_jobs::{
    CancelSignal, CancelWhen, CancellationToken, Deadline, DoneEvent, FnSink, Job, JobError,
    JobExecutor, JobId, JobManager, JobSnapshot, JobState, JobStatus, ManagerError, NeverCancel,
    NullSink, ProgressEvent, ProgressSink, StreamOutcome, TransitionError, run_streaming,
    run_sync,
};
