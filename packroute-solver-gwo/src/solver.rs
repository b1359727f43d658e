//! [`Optimizer`] implementation running a [`GwoEngine`] to completion.

use std::time::Instant;

use packroute_core::{
    Instance, OptimizationConfig, OptimizationResult, OptimizeError, Optimizer, RandomKeyCodec,
    SolutionCodec,
};

use crate::GwoEngine;

/// Grey Wolf Optimizer behind the core [`Optimizer`] trait.
///
/// The solver is generic over the [`SolutionCodec`] so alternative encodings
/// can replace random keys without touching the search loop.
#[derive(Debug, Clone, Default)]
pub struct GwoSolver<C = RandomKeyCodec> {
    codec: C,
}

impl GwoSolver {
    /// Construct a solver using the random-key codec.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            codec: RandomKeyCodec,
        }
    }
}

impl<C> GwoSolver<C>
where
    C: SolutionCodec,
{
    /// Construct a solver with an explicit codec.
    #[must_use]
    pub const fn with_codec(codec: C) -> Self {
        Self { codec }
    }

    /// The codec used to decode positions.
    #[must_use]
    pub const fn codec(&self) -> &C {
        &self.codec
    }
}

impl<C> Optimizer for GwoSolver<C>
where
    C: SolutionCodec,
{
    fn optimize(
        &self,
        instance: &Instance,
        config: &OptimizationConfig,
    ) -> Result<OptimizationResult, OptimizeError> {
        let started_at = Instant::now();
        let mut engine = GwoEngine::new(instance, *config, &self.codec)?;
        engine.run_to_completion();
        let result = engine.result(started_at.elapsed());
        log::info!(
            "solved {} customers with {} routes, fitness {:.4} in {:.3}s",
            instance.customer_count(),
            result.vehicle_count(),
            result.best_fitness,
            result.runtime_seconds
        );
        Ok(result)
    }
}
