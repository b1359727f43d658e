//! Blocking and streaming execution of one GWO run.
//!
//! Both contracts drive the same [`GwoEngine`] loop, so a streaming run that
//! is never cancelled returns the same routes and fitness as [`run_sync`].

use std::time::Instant;

use packroute_core::{
    Instance, OptimizationConfig, OptimizationResult, OptimizeError, RandomKeyCodec,
    SolutionCodec,
};
use packroute_solver_gwo::GwoEngine;
use thiserror::Error;

use crate::{
    CancelSignal, DoneEvent, Job, JobStatus, NeverCancel, NullSink, ProgressSink, TransitionError,
};

/// Errors from [`JobExecutor::execute`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum JobError {
    /// The job was not in a state that allows the requested step.
    #[error(transparent)]
    Transition(#[from] TransitionError),
    /// The run was rejected before its first iteration.
    #[error(transparent)]
    Optimize(#[from] OptimizeError),
}

/// How a streaming run ended.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamOutcome {
    /// `Completed` or `Cancelled`.
    pub status: JobStatus,
    /// Final or best-so-far result.
    pub result: OptimizationResult,
}

impl StreamOutcome {
    /// Whether the run stopped early.
    #[must_use]
    pub fn was_cancelled(&self) -> bool {
        self.status == JobStatus::Cancelled
    }
}

/// Runs GWO searches with a fixed codec.
#[derive(Debug, Clone, Default)]
pub struct JobExecutor<C = RandomKeyCodec> {
    codec: C,
}

impl JobExecutor {
    /// Executor using the random-key codec.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            codec: RandomKeyCodec,
        }
    }
}

impl<C> JobExecutor<C>
where
    C: SolutionCodec,
{
    /// Executor using `codec`.
    #[must_use]
    pub const fn with_codec(codec: C) -> Self {
        Self { codec }
    }

    /// Run to completion and return the result; blocks the caller.
    ///
    /// # Errors
    ///
    /// Returns [`OptimizeError`] when the instance is infeasible or the
    /// configuration is unusable.
    pub fn run_sync(
        &self,
        instance: &Instance,
        config: &OptimizationConfig,
    ) -> Result<OptimizationResult, OptimizeError> {
        self.run_streaming(instance, config, &mut NullSink, &NeverCancel)
            .map(|outcome| outcome.result)
    }

    /// Run while pushing samples to `sink` and polling `cancel` before each
    /// iteration.
    ///
    /// Samples arrive in iteration order starting with iteration `0`; the
    /// done event is always last. A cancelled run is not an error: it
    /// returns [`JobStatus::Cancelled`] with the best result found so far.
    /// Validation failures return early without emitting any event.
    ///
    /// # Errors
    ///
    /// Returns [`OptimizeError`] when the instance is infeasible or the
    /// configuration is unusable.
    pub fn run_streaming<S, K>(
        &self,
        instance: &Instance,
        config: &OptimizationConfig,
        sink: &mut S,
        cancel: &K,
    ) -> Result<StreamOutcome, OptimizeError>
    where
        S: ProgressSink + ?Sized,
        K: CancelSignal + ?Sized,
    {
        let started_at = Instant::now();
        let mut engine = GwoEngine::new(instance, *config, &self.codec)?;
        for sample in engine.history() {
            sink.on_progress(*sample);
        }

        let mut status = JobStatus::Completed;
        while !engine.is_converged() {
            if cancel.is_cancelled() {
                status = JobStatus::Cancelled;
                log::info!("run cancelled after {} iterations", engine.iteration());
                break;
            }
            if let Some(sample) = engine.step().and_then(|step| step.sample()) {
                sink.on_progress(sample);
            }
        }

        let result = engine.result(started_at.elapsed());
        sink.on_done(&DoneEvent::new(&result, status));
        Ok(StreamOutcome { status, result })
    }

    /// Drive `job` from `Pending` to a terminal state.
    ///
    /// Samples are recorded on the job as well as forwarded to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::Transition`] if the job is not pending and
    /// [`JobError::Optimize`] if the run was rejected; in the latter case the
    /// job is left `Failed`.
    pub fn execute<S, K>(
        &self,
        job: &mut Job,
        sink: &mut S,
        cancel: &K,
    ) -> Result<JobStatus, JobError>
    where
        S: ProgressSink + ?Sized,
        K: CancelSignal + ?Sized,
    {
        job.start()?;
        log::info!(
            "job {} started: {} customers, {} wolves, {} iterations",
            job.id(),
            job.instance().customer_count(),
            job.config().population_size,
            job.config().max_iterations
        );
        match self.run_streaming(job.instance(), job.config(), sink, cancel) {
            Ok(StreamOutcome { status, result }) => {
                for sample in &result.convergence_history {
                    job.record(*sample);
                }
                if status == JobStatus::Cancelled {
                    job.cancel(result)?;
                } else {
                    job.complete(result)?;
                }
                log::info!("job {} finished {status}", job.id());
                Ok(status)
            }
            Err(error) => {
                log::warn!("job {} failed: {error}", job.id());
                job.fail(error.clone())?;
                Err(JobError::Optimize(error))
            }
        }
    }
}

/// [`JobExecutor::run_sync`] with the random-key codec.
///
/// # Errors
///
/// See [`JobExecutor::run_sync`].
///
/// # Examples
/// ```
/// use packroute_core::{Customer, Instance, Location, OptimizationConfig};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let instance = Instance::builder(Location::depot(0.0, 0.0), 10)
///     .customer(Customer::new(1, 0.0, 1.0, 6))
///     .customer(Customer::new(2, 1.0, 0.0, 6))
///     .build()?;
/// let result = packroute_jobs::run_sync(&instance, &OptimizationConfig::default())?;
/// assert_eq!(result.routes.len(), 2);
/// # Ok(())
/// # }
/// ```
pub fn run_sync(
    instance: &Instance,
    config: &OptimizationConfig,
) -> Result<OptimizationResult, OptimizeError> {
    JobExecutor::new().run_sync(instance, config)
}

/// [`JobExecutor::run_streaming`] with the random-key codec.
///
/// # Errors
///
/// See [`JobExecutor::run_streaming`].
pub fn run_streaming<S, K>(
    instance: &Instance,
    config: &OptimizationConfig,
    sink: &mut S,
    cancel: &K,
) -> Result<StreamOutcome, OptimizeError>
where
    S: ProgressSink + ?Sized,
    K: CancelSignal + ?Sized,
{
    JobExecutor::new().run_streaming(instance, config, sink, cancel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CancellationToken, ProgressEvent};
    use packroute_core::test_support::{five_customer_instance, oversized_demand_instance};
    use rstest::{fixture, rstest};

    #[fixture]
    fn instance() -> Instance {
        five_customer_instance().expect("valid instance")
    }

    fn config() -> OptimizationConfig {
        OptimizationConfig::default()
            .with_population_size(10)
            .with_max_iterations(25)
    }

    #[rstest]
    fn streaming_without_cancel_matches_sync(instance: Instance) {
        let sync = run_sync(&instance, &config()).expect("valid run");
        let mut events: Vec<ProgressEvent> = Vec::new();
        let streamed =
            run_streaming(&instance, &config(), &mut events, &NeverCancel).expect("valid run");
        assert_eq!(streamed.status, JobStatus::Completed);
        assert_eq!(streamed.result.routes, sync.routes);
        assert_eq!(streamed.result.best_fitness.to_bits(), sync.best_fitness.to_bits());
        assert_eq!(streamed.result.convergence_history, sync.convergence_history);
        assert_eq!(events.len(), sync.convergence_history.len() + 1);
    }

    #[rstest]
    fn done_event_is_last(instance: Instance) {
        let mut events: Vec<ProgressEvent> = Vec::new();
        run_streaming(&instance, &config(), &mut events, &NeverCancel).expect("valid run");
        let done_positions: Vec<usize> = events
            .iter()
            .enumerate()
            .filter(|(_, event)| event.is_done())
            .map(|(index, _)| index)
            .collect();
        assert_eq!(done_positions, vec![events.len() - 1]);
    }

    #[rstest]
    fn pre_cancelled_runs_stop_before_the_first_iteration(instance: Instance) {
        let token = CancellationToken::new();
        token.cancel();
        let outcome = run_streaming(&instance, &config(), &mut NullSink, &token).expect("valid run");
        assert!(outcome.was_cancelled());
        assert_eq!(outcome.result.iterations_completed, 0);
        assert_eq!(outcome.result.convergence_history.len(), 1);
        assert!(!outcome.result.routes.is_empty());
    }

    #[rstest]
    fn rejected_runs_emit_nothing() {
        let instance = oversized_demand_instance().expect("valid shape");
        let mut events: Vec<ProgressEvent> = Vec::new();
        let err = run_streaming(&instance, &config(), &mut events, &NeverCancel)
            .expect_err("infeasible");
        assert!(matches!(err, OptimizeError::InvalidInstance(_)));
        assert!(events.is_empty());
    }

    #[rstest]
    fn execute_records_history_and_completes(instance: Instance) {
        let mut job = Job::new(instance, config());
        let status = JobExecutor::new()
            .execute(&mut job, &mut NullSink, &NeverCancel)
            .expect("job runs");
        assert_eq!(status, JobStatus::Completed);
        assert_eq!(job.history().len(), 26);
        assert!(job.result().is_some());
    }

    #[rstest]
    fn execute_marks_rejected_jobs_failed() {
        let instance = oversized_demand_instance().expect("valid shape");
        let mut job = Job::new(instance, config());
        let err = JobExecutor::new()
            .execute(&mut job, &mut NullSink, &NeverCancel)
            .expect_err("infeasible");
        assert!(matches!(err, JobError::Optimize(_)));
        assert_eq!(job.status(), JobStatus::Failed);
        assert!(job.error().is_some());
    }

    #[rstest]
    fn execute_refuses_to_rerun_a_finished_job(instance: Instance) {
        let mut job = Job::new(instance, config());
        let executor = JobExecutor::new();
        executor
            .execute(&mut job, &mut NullSink, &NeverCancel)
            .expect("first run");
        let err = executor
            .execute(&mut job, &mut NullSink, &NeverCancel)
            .expect_err("second run");
        assert!(matches!(err, JobError::Transition(_)));
    }
}
