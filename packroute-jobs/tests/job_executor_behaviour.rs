//! Behavioural tests for streaming execution and the job manager.

use std::cell::RefCell;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use packroute_core::test_support::five_customer_instance;
use packroute_core::{Instance, OptimizationConfig, OptimizationResult};
use packroute_jobs::{
    CancelSignal, CancelWhen, Deadline, JobManager, JobSnapshot, JobStatus, NeverCancel, NullSink,
    ProgressEvent, StreamOutcome, run_streaming, run_sync,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

#[derive(Debug, Default)]
struct JobWorld {
    instance: RefCell<Option<Instance>>,
    config: RefCell<OptimizationConfig>,
    events: RefCell<Vec<ProgressEvent>>,
    streamed: RefCell<Option<StreamOutcome>>,
    blocking: RefCell<Option<OptimizationResult>>,
    managed: RefCell<Option<(JobManager, JobSnapshot)>>,
}

impl JobWorld {
    #[expect(
        clippy::expect_used,
        reason = "behaviour tests use expect for readable failures"
    )]
    fn instance(&self) -> Instance {
        self.instance
            .borrow()
            .clone()
            .expect("instance should be set")
    }

    #[expect(
        clippy::expect_used,
        reason = "behaviour tests use expect for readable failures"
    )]
    fn streamed(&self) -> StreamOutcome {
        self.streamed
            .borrow()
            .clone()
            .expect("a streaming run should have been recorded")
    }

    #[expect(
        clippy::expect_used,
        reason = "behaviour tests use expect for readable failures"
    )]
    fn stream_with(&self, cancel: &dyn CancelSignal) {
        let instance = self.instance();
        let config = *self.config.borrow();
        let mut events = Vec::new();
        let outcome =
            run_streaming(&instance, &config, &mut events, cancel).expect("run is accepted");
        self.events.replace(events);
        self.streamed.replace(Some(outcome));
    }
}

#[fixture]
fn world() -> JobWorld {
    JobWorld::default()
}

#[given("the five-customer instance")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn given_instance(world: &JobWorld) {
    let instance = five_customer_instance().expect("fixture instance is valid");
    world.instance.replace(Some(instance));
}

#[given("a pack of 10 wolves for {iterations} iterations")]
fn given_pack(world: &JobWorld, iterations: u32) {
    world.config.replace(
        OptimizationConfig::default()
            .with_population_size(10)
            .with_max_iterations(iterations)
            .with_seed(7),
    );
}

#[when("the run streams without cancellation")]
fn when_streams(world: &JobWorld) {
    world.stream_with(&NeverCancel);
}

#[when("the same run blocks until finished")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn when_blocks(world: &JobWorld) {
    let result = run_sync(&world.instance(), &world.config.borrow()).expect("run is accepted");
    world.blocking.replace(Some(result));
}

#[when("the run streams and is cancelled after {iterations} iterations")]
fn when_cancelled_after(world: &JobWorld, iterations: u32) {
    let polls = AtomicU32::new(0);
    let cancel = CancelWhen(|| polls.fetch_add(1, Ordering::Relaxed) >= iterations);
    world.stream_with(&cancel);
}

#[when("the run streams with a zero time budget")]
fn when_zero_budget(world: &JobWorld) {
    world.stream_with(&Deadline::new(NeverCancel, Duration::ZERO));
}

#[when("the job is submitted to a manager and awaited")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn when_managed(world: &JobWorld) {
    let manager = JobManager::new();
    let id = manager.submit(world.instance(), *world.config.borrow());
    assert_eq!(manager.status(id).expect("job is known"), JobStatus::Pending);
    manager
        .start(id, NullSink)
        .expect("pending job starts");
    let snapshot = manager.wait(id).expect("worker finishes");
    world.managed.replace(Some((manager, snapshot)));
}

#[then("both runs report the same routes and best fitness")]
#[expect(
    clippy::expect_used,
    clippy::float_cmp,
    reason = "equivalence is checked with exact float equality"
)]
fn then_equivalent(world: &JobWorld) {
    let streamed = world.streamed();
    let blocking = world
        .blocking
        .borrow()
        .clone()
        .expect("blocking run recorded");
    assert_eq!(streamed.status, JobStatus::Completed);
    assert_eq!(streamed.result.routes, blocking.routes);
    assert_eq!(streamed.result.best_fitness, blocking.best_fitness);
}

#[then("the done event is the last event")]
fn then_done_last(world: &JobWorld) {
    let events = world.events.borrow();
    assert!(events.last().is_some_and(ProgressEvent::is_done));
    assert_eq!(events.iter().filter(|event| event.is_done()).count(), 1);
}

#[then("the run ends cancelled")]
fn then_cancelled(world: &JobWorld) {
    assert_eq!(world.streamed().status, JobStatus::Cancelled);
}

#[then("at most {count} samples are streamed")]
fn then_sample_bound(world: &JobWorld, count: usize) {
    let samples = world
        .events
        .borrow()
        .iter()
        .filter(|event| !event.is_done())
        .count();
    assert!(samples <= count, "{samples} samples streamed");
    assert!(samples >= 1);
}

#[then("the result still visits every customer")]
fn then_cover(world: &JobWorld) {
    let result = world.streamed().result;
    let visited: HashSet<u64> = result
        .routes
        .iter()
        .flatten()
        .copied()
        .filter(|stop| *stop != 0)
        .collect();
    assert_eq!(visited, (1..=5).collect::<HashSet<u64>>());
}

#[then("the managed job is completed with {count} samples")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn then_managed_completed(world: &JobWorld, count: usize) {
    let managed = world.managed.borrow();
    let (_, snapshot) = managed.as_ref().expect("managed job recorded");
    assert_eq!(snapshot.status, JobStatus::Completed);
    assert_eq!(snapshot.history.len(), count);
    assert!(snapshot.result.is_some());
}

#[then("the managed job can be removed")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn then_removed(world: &JobWorld) {
    let managed = world.managed.borrow();
    let (manager, snapshot) = managed.as_ref().expect("managed job recorded");
    let removed = manager.remove(snapshot.id).expect("finished job is removable");
    assert_eq!(&removed, snapshot);
    assert!(manager.ids().is_empty());
}

#[scenario(path = "tests/features/job_executor.feature", index = 0)]
fn streaming_matches_blocking(world: JobWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/job_executor.feature", index = 1)]
fn cancellation_keeps_best_so_far(world: JobWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/job_executor.feature", index = 2)]
fn time_budget_cancels(world: JobWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/job_executor.feature", index = 3)]
fn managed_lifecycle(world: JobWorld) {
    let _ = world;
}
