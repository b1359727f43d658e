//! Core domain types for the packroute capacitated vehicle routing engine.
//!
//! The crate holds the immutable [`Instance`] model, the [`SolutionCodec`]
//! that maps continuous search positions onto routes, the [`fitness`]
//! evaluator and the [`Optimizer`] trait implemented by solver crates.
//! Constructors return `Result` so malformed input surfaces before any search
//! begins.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod baseline;
mod codec;
mod config;
mod distance;
pub mod fitness;
mod instance;
mod location;
mod optimizer;
mod result;
mod route;
pub mod synthetic;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use codec::{RandomKeyCodec, SearchSpace, SolutionCodec, compare_fitness};
pub use config::{ConfigError, MIN_POPULATION_SIZE, OptimizationConfig};
pub use distance::{DistanceMatrix, DistanceMetric};
pub use instance::{DEFAULT_PENALTY_COEFFICIENT, Instance, InstanceBuilder, InstanceError};
pub use location::{Customer, DEPOT_ID, Location};
pub use optimizer::{OptimizeError, Optimizer, validate_run};
pub use result::{ConvergenceSample, OptimizationResult};
pub use route::{Route, RouteSummary};
