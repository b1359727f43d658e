//! Grey Wolf Optimizer for the capacitated vehicle routing problem.
//!
//! [`GwoEngine`] is the step-wise search loop; [`GwoSolver`] wraps it behind
//! the [`Optimizer`](packroute_core::Optimizer) trait for callers that only
//! want a finished result. Wolves live in a [`Pack`] that keeps the alpha,
//! beta and delta leaders ranked after every iteration.
//!
//! Every engine seeds its own `ChaCha8Rng` from the run configuration, so two
//! runs with the same instance and configuration are bit-identical no matter
//! what else executes concurrently.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod engine;
mod pack;
mod solver;
mod wolf;

pub use engine::{EngineState, GwoEngine, Step};
pub use pack::{Leaders, Pack};
pub use solver::GwoSolver;
pub use wolf::Wolf;
