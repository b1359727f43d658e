//! The GWO search loop as an explicit state machine.
//!
//! An engine starts `Initialized` with a ranked pack and a sample for
//! iteration `0`. Each [`GwoEngine::step`] moves every wolf once, re-ranks the
//! pack and advances the iteration counter. The engine is `Converged` once the
//! iteration budget is spent; it never stops early on a plateau.

use std::time::Duration;

use packroute_core::{
    ConfigError, ConvergenceSample, Instance, MIN_POPULATION_SIZE, OptimizationConfig,
    OptimizationResult, OptimizeError, RandomKeyCodec, SolutionCodec, fitness, validate_run,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{Pack, Wolf};

/// Lifecycle of a [`GwoEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineState {
    /// Pack spawned and ranked; no iteration has run.
    Initialized,
    /// At least one iteration has run and budget remains.
    Iterating,
    /// The iteration budget is spent.
    Converged,
}

/// Outcome of one [`GwoEngine::step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    /// Iteration just completed (1-based).
    pub iteration: u32,
    /// Alpha fitness after the iteration.
    pub best_fitness: f64,
    /// Whether a convergence sample was recorded for this iteration.
    pub reported: bool,
}

impl Step {
    /// The recorded sample, if any.
    #[must_use]
    pub const fn sample(&self) -> Option<ConvergenceSample> {
        if self.reported {
            Some(ConvergenceSample::new(self.iteration, self.best_fitness))
        } else {
            None
        }
    }
}

/// One Grey Wolf Optimizer run over a borrowed instance.
///
/// The engine owns its pack and its seeded `ChaCha8Rng`; nothing is shared
/// with other engines, so identical inputs give bit-identical runs.
///
/// # Examples
/// ```
/// use packroute_core::{Customer, Instance, Location, OptimizationConfig, RandomKeyCodec};
/// use packroute_solver_gwo::{EngineState, GwoEngine};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let instance = Instance::builder(Location::depot(0.0, 0.0), 10)
///     .customer(Customer::new(1, 0.0, 1.0, 4))
///     .customer(Customer::new(2, 1.0, 0.0, 4))
///     .customer(Customer::new(3, 1.0, 1.0, 4))
///     .build()?;
/// let config = OptimizationConfig::default().with_max_iterations(5);
/// let mut engine = GwoEngine::new(&instance, config, &RandomKeyCodec)?;
/// engine.run_to_completion();
/// assert_eq!(engine.state(), EngineState::Converged);
/// assert_eq!(engine.history().len(), 6);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct GwoEngine<'a, C: SolutionCodec + ?Sized = RandomKeyCodec> {
    instance: &'a Instance,
    codec: &'a C,
    config: OptimizationConfig,
    rng: ChaCha8Rng,
    pack: Pack,
    history: Vec<ConvergenceSample>,
    state: EngineState,
}

impl<'a, C> GwoEngine<'a, C>
where
    C: SolutionCodec + ?Sized,
{
    /// Validate the inputs, spawn the pack and record the iteration-0 sample.
    ///
    /// # Errors
    ///
    /// Returns [`OptimizeError::InvalidConfig`] for unusable parameters and
    /// [`OptimizeError::InvalidInstance`] when a customer cannot fit into any
    /// vehicle.
    pub fn new(
        instance: &'a Instance,
        config: OptimizationConfig,
        codec: &'a C,
    ) -> Result<Self, OptimizeError> {
        validate_run(instance, &config)?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let size = usize::try_from(config.population_size).unwrap_or(usize::MAX);
        let pack = Pack::spawn(size, instance, codec, &mut rng).ok_or(
            ConfigError::PopulationTooSmall {
                min: MIN_POPULATION_SIZE,
                actual: config.population_size,
            },
        )?;
        let initial = ConvergenceSample::new(0, pack.alpha().fitness());
        log::debug!(
            "spawned {} wolves for {} customers, initial best {:.4}",
            config.population_size,
            instance.customer_count(),
            initial.best_fitness
        );
        Ok(Self {
            instance,
            codec,
            config,
            rng,
            pack,
            history: vec![initial],
            state: EngineState::Initialized,
        })
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> EngineState {
        self.state
    }

    /// Whether the iteration budget is spent.
    #[must_use]
    pub const fn is_converged(&self) -> bool {
        matches!(self.state, EngineState::Converged)
    }

    /// Completed iterations.
    #[must_use]
    pub const fn iteration(&self) -> u32 {
        self.pack.iteration()
    }

    /// Parameters of this run.
    #[must_use]
    pub const fn config(&self) -> &OptimizationConfig {
        &self.config
    }

    /// Best wolf found so far.
    #[must_use]
    pub const fn best(&self) -> &Wolf {
        self.pack.alpha()
    }

    /// The pack in its current state.
    #[must_use]
    pub const fn pack(&self) -> &Pack {
        &self.pack
    }

    /// Convergence samples recorded so far, in iteration order.
    #[must_use]
    pub fn history(&self) -> &[ConvergenceSample] {
        &self.history
    }

    /// Run one iteration: move every wolf, re-rank and maybe record a sample.
    ///
    /// Returns `None` once the engine has converged.
    pub fn step(&mut self) -> Option<Step> {
        if self.is_converged() {
            return None;
        }
        self.state = EngineState::Iterating;
        self.pack.advance();
        let iteration = self.pack.iteration();
        let a = exploration_coefficient(iteration, self.config.max_iterations);

        // Leaders are fixed for the whole iteration.
        let leaders: Vec<Vec<f64>> = self
            .pack
            .leaders()
            .in_pull_order()
            .iter()
            .map(|leader| leader.position().to_vec())
            .collect();
        for wolf in self.pack.wolves_mut() {
            let mut position = pull(wolf.position(), &leaders, a, &mut self.rng);
            self.codec.clamp(&mut position, self.instance);
            wolf.relocate(position, self.codec, self.instance);
        }
        self.pack.rank();

        let best_fitness = self.pack.alpha().fitness();
        let reported = self.config.is_report_due(iteration);
        if reported {
            self.history
                .push(ConvergenceSample::new(iteration, best_fitness));
            log::trace!("iteration {iteration}: best {best_fitness:.4}");
        }
        if iteration >= self.config.max_iterations {
            self.state = EngineState::Converged;
            log::debug!("converged after {iteration} iterations, best {best_fitness:.4}");
        }
        Some(Step {
            iteration,
            best_fitness,
            reported,
        })
    }

    /// Step until converged.
    pub fn run_to_completion(&mut self) {
        while self.step().is_some() {}
    }

    /// Describe the best solution found so far.
    ///
    /// Callable in any state, so a cancelled run can still report its
    /// best-so-far routes.
    #[must_use]
    pub fn result(&self, runtime: Duration) -> OptimizationResult {
        let alpha = self.pack.alpha();
        OptimizationResult {
            routes: alpha
                .routes()
                .iter()
                .map(|route| route.stops(self.instance))
                .collect(),
            best_fitness: alpha.fitness(),
            convergence_history: self.history.clone(),
            runtime_seconds: runtime.as_secs_f64(),
            route_details: fitness::summarize(alpha.routes(), self.instance),
            iterations_completed: self.pack.iteration(),
        }
    }
}

/// `a = 2 − 2·t/T`, falling linearly from 2 towards 0.
#[expect(
    clippy::float_arithmetic,
    reason = "the coefficient schedule is a floating-point ratio"
)]
fn exploration_coefficient(iteration: u32, max_iterations: u32) -> f64 {
    2.0 - 2.0 * f64::from(iteration) / f64::from(max_iterations.max(1))
}

/// Average of the alpha, beta and delta pulls on `position`.
///
/// For each leader a fresh `r1` vector is drawn, then a fresh `r2` vector.
#[expect(
    clippy::float_arithmetic,
    reason = "the GWO update rule is floating-point vector arithmetic"
)]
fn pull<R>(position: &[f64], leaders: &[Vec<f64>], a: f64, rng: &mut R) -> Vec<f64>
where
    R: Rng + ?Sized,
{
    let mut sum = vec![0.0_f64; position.len()];
    for leader in leaders {
        let r1: Vec<f64> = (0..position.len()).map(|_| rng.r#gen()).collect();
        let r2: Vec<f64> = (0..position.len()).map(|_| rng.r#gen()).collect();
        for (((slot, x), l), (u, v)) in sum
            .iter_mut()
            .zip(position)
            .zip(leader)
            .zip(r1.iter().zip(&r2))
        {
            let big_a = 2.0 * a * u - a;
            let big_c = 2.0 * v;
            let distance = (big_c * l - x).abs();
            *slot += l - big_a * distance;
        }
    }
    let count = f64::from(u32::try_from(leaders.len()).unwrap_or(u32::MAX).max(1));
    sum.iter().map(|total| total / count).collect()
}
