//! In-process registry of concurrently running jobs.
//!
//! Each started job runs on its own named worker thread and owns its own
//! random generator, so jobs never share mutable search state. The registry
//! keeps a [`JobSnapshot`] per job that the worker updates as samples arrive.

use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use packroute_core::{
    ConvergenceSample, Instance, OptimizationConfig, OptimizationResult, RandomKeyCodec,
    SolutionCodec,
};
use thiserror::Error;

use crate::{
    CancelSignal, CancellationToken, Deadline, DoneEvent, Job, JobExecutor, JobId, JobStatus,
    ProgressSink,
};

/// Errors from [`JobManager`] operations.
#[derive(Debug, Error)]
pub enum ManagerError {
    /// No job with this id is registered.
    #[error("unknown job {0}")]
    UnknownJob(JobId),
    /// The job has already been started.
    #[error("job {id} is {status}, not pending")]
    NotPending {
        /// Job identifier.
        id: JobId,
        /// Current status.
        status: JobStatus,
    },
    /// The job has not been started, so there is nothing to wait for.
    #[error("job {0} has not been started")]
    NotStarted(JobId),
    /// The job is still pending or running.
    #[error("job {id} is {status}, not finished")]
    NotTerminal {
        /// Job identifier.
        id: JobId,
        /// Current status.
        status: JobStatus,
    },
    /// The worker thread panicked before reporting a final state.
    #[error("worker for job {0} panicked")]
    WorkerPanicked(JobId),
    /// The operating system refused to start a worker thread.
    #[error("failed to spawn worker for job {id}: {source}")]
    Spawn {
        /// Job identifier.
        id: JobId,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// Point-in-time view of a job, readable while it runs.
#[derive(Debug, Clone, PartialEq)]
pub struct JobSnapshot {
    /// Job identifier.
    pub id: JobId,
    /// Lifecycle status.
    pub status: JobStatus,
    /// Samples recorded so far.
    pub history: Vec<ConvergenceSample>,
    /// Final or best-so-far result once terminal.
    pub result: Option<OptimizationResult>,
    /// Failure reason for failed jobs.
    pub error: Option<String>,
}

impl JobSnapshot {
    const fn pending(id: JobId) -> Self {
        Self {
            id,
            status: JobStatus::Pending,
            history: Vec::new(),
            result: None,
            error: None,
        }
    }

    /// Latest recorded sample.
    #[must_use]
    pub fn latest(&self) -> Option<&ConvergenceSample> {
        self.history.last()
    }
}

/// A job's snapshot plus the condition raised once it turns terminal.
#[derive(Debug)]
struct Shared {
    snapshot: Mutex<JobSnapshot>,
    finished: Condvar,
}

impl Shared {
    const fn new(id: JobId) -> Self {
        Self {
            snapshot: Mutex::new(JobSnapshot::pending(id)),
            finished: Condvar::new(),
        }
    }

    fn view(&self) -> MutexGuard<'_, JobSnapshot> {
        lock(&self.snapshot)
    }

    /// Apply the final update and wake every waiter.
    fn finish(&self, update: impl FnOnce(&mut JobSnapshot)) {
        update(&mut self.view());
        self.finished.notify_all();
    }

    /// Block until the snapshot reaches a terminal status.
    fn wait_terminal(&self) -> JobSnapshot {
        let guard = self
            .finished
            .wait_while(self.view(), |snapshot| !snapshot.status.is_terminal())
            .unwrap_or_else(PoisonError::into_inner);
        JobSnapshot::clone(&guard)
    }
}

#[derive(Debug)]
struct Entry {
    shared: Arc<Shared>,
    token: CancellationToken,
    pending: Option<Job>,
    worker: Option<JoinHandle<()>>,
}

/// Registry of submitted jobs and their worker threads.
///
/// # Examples
/// ```
/// use packroute_core::{Customer, Instance, Location, OptimizationConfig};
/// use packroute_jobs::{JobManager, JobStatus, NullSink};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let instance = Instance::builder(Location::depot(0.0, 0.0), 10)
///     .customer(Customer::new(1, 0.0, 1.0, 4))
///     .build()?;
/// let manager = JobManager::new();
/// let id = manager.submit(instance, OptimizationConfig::default().with_max_iterations(5));
/// manager.start(id, NullSink)?;
/// let snapshot = manager.wait(id)?;
/// assert_eq!(snapshot.status, JobStatus::Completed);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct JobManager<C = RandomKeyCodec> {
    executor: Arc<JobExecutor<C>>,
    jobs: Mutex<HashMap<JobId, Entry>>,
}

impl JobManager {
    /// Manager using the random-key codec.
    #[must_use]
    pub fn new() -> Self {
        Self::with_executor(JobExecutor::new())
    }
}

impl Default for JobManager {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> JobManager<C>
where
    C: SolutionCodec + 'static,
{
    /// Manager running every job through `executor`.
    #[must_use]
    pub fn with_executor(executor: JobExecutor<C>) -> Self {
        Self {
            executor: Arc::new(executor),
            jobs: Mutex::new(HashMap::new()),
        }
    }

    /// Register a pending job and return its id.
    #[must_use]
    pub fn submit(&self, instance: Instance, config: OptimizationConfig) -> JobId {
        let job = Job::new(instance, config);
        let id = job.id();
        let entry = Entry {
            shared: Arc::new(Shared::new(id)),
            token: CancellationToken::new(),
            pending: Some(job),
            worker: None,
        };
        lock(&self.jobs).insert(id, entry);
        log::debug!("job {id} submitted");
        id
    }

    /// Start a pending job on a worker thread, streaming into `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::UnknownJob`], [`ManagerError::NotPending`] or
    /// [`ManagerError::Spawn`].
    pub fn start<S>(&self, id: JobId, sink: S) -> Result<(), ManagerError>
    where
        S: ProgressSink + Send + 'static,
    {
        self.launch(id, sink, |token| token)
    }

    /// Like [`JobManager::start`], cancelling the job once `budget` elapses.
    ///
    /// The budget starts when the worker begins iterating.
    ///
    /// # Errors
    ///
    /// See [`JobManager::start`].
    pub fn start_with_deadline<S>(
        &self,
        id: JobId,
        sink: S,
        budget: Duration,
    ) -> Result<(), ManagerError>
    where
        S: ProgressSink + Send + 'static,
    {
        self.launch(id, sink, move |token| Deadline::new(token, budget))
    }

    fn launch<S, K, F>(&self, id: JobId, sink: S, signal: F) -> Result<(), ManagerError>
    where
        S: ProgressSink + Send + 'static,
        K: CancelSignal,
        F: FnOnce(CancellationToken) -> K + Send + 'static,
    {
        let mut jobs = lock(&self.jobs);
        let entry = jobs.get_mut(&id).ok_or(ManagerError::UnknownJob(id))?;
        let Some(job) = entry.pending.clone() else {
            return Err(ManagerError::NotPending {
                id,
                status: entry.shared.view().status,
            });
        };

        let shared = Arc::clone(&entry.shared);
        let token = entry.token.clone();
        let executor = Arc::clone(&self.executor);
        shared.view().status = JobStatus::Running;
        let spawned = thread::Builder::new()
            .name(format!("packroute-job-{id}"))
            .spawn(move || run_worker(&executor, job, sink, &signal(token), &shared));

        match spawned {
            Ok(handle) => {
                entry.pending = None;
                entry.worker = Some(handle);
                Ok(())
            }
            Err(source) => {
                entry.shared.view().status = JobStatus::Pending;
                Err(ManagerError::Spawn { id, source })
            }
        }
    }

    /// Request cancellation.
    ///
    /// A running job stops at its next iteration boundary. A pending job
    /// keeps its status until started, then stops before its first
    /// iteration. Cancelling a finished job has no effect.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::UnknownJob`].
    pub fn cancel(&self, id: JobId) -> Result<(), ManagerError> {
        let jobs = lock(&self.jobs);
        let entry = jobs.get(&id).ok_or(ManagerError::UnknownJob(id))?;
        entry.token.cancel();
        log::debug!("job {id} cancellation requested");
        Ok(())
    }

    /// Current status.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::UnknownJob`].
    pub fn status(&self, id: JobId) -> Result<JobStatus, ManagerError> {
        self.with_entry(id, |entry| entry.shared.view().status)
    }

    /// Copy of the job's current snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::UnknownJob`].
    pub fn snapshot(&self, id: JobId) -> Result<JobSnapshot, ManagerError> {
        self.with_entry(id, |entry| entry.shared.view().clone())
    }

    /// Ids of every registered job.
    #[must_use]
    pub fn ids(&self) -> Vec<JobId> {
        lock(&self.jobs).keys().copied().collect()
    }

    /// Block until a started job finishes and return its final snapshot.
    ///
    /// Any number of callers may wait on the same job; each one returns only
    /// once the job is terminal. The first waiter also joins the worker
    /// thread.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::UnknownJob`], [`ManagerError::NotStarted`] or
    /// [`ManagerError::WorkerPanicked`].
    pub fn wait(&self, id: JobId) -> Result<JobSnapshot, ManagerError> {
        let (worker, shared) = {
            let mut jobs = lock(&self.jobs);
            let entry = jobs.get_mut(&id).ok_or(ManagerError::UnknownJob(id))?;
            if entry.pending.is_some() {
                return Err(ManagerError::NotStarted(id));
            }
            (entry.worker.take(), Arc::clone(&entry.shared))
        };
        if let Some(handle) = worker {
            join(id, handle, &shared)?;
        }
        Ok(shared.wait_terminal())
    }

    /// Drop a finished job from the registry and return its last snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::UnknownJob`] or [`ManagerError::NotTerminal`].
    pub fn remove(&self, id: JobId) -> Result<JobSnapshot, ManagerError> {
        let entry = {
            let mut jobs = lock(&self.jobs);
            let status = jobs
                .get(&id)
                .map(|entry| entry.shared.view().status)
                .ok_or(ManagerError::UnknownJob(id))?;
            if !status.is_terminal() {
                return Err(ManagerError::NotTerminal { id, status });
            }
            jobs.remove(&id).ok_or(ManagerError::UnknownJob(id))?
        };
        if let Some(handle) = entry.worker {
            join(id, handle, &entry.shared)?;
        }
        let removed = entry.shared.view().clone();
        Ok(removed)
    }

    fn with_entry<T>(&self, id: JobId, read: impl FnOnce(&Entry) -> T) -> Result<T, ManagerError> {
        lock(&self.jobs)
            .get(&id)
            .map(read)
            .ok_or(ManagerError::UnknownJob(id))
    }
}

/// Forwards to the caller's sink while mirroring samples into the snapshot.
struct Recording<S> {
    shared: Arc<Shared>,
    inner: S,
}

impl<S> ProgressSink for Recording<S>
where
    S: ProgressSink,
{
    fn on_progress(&mut self, sample: ConvergenceSample) {
        self.shared.view().history.push(sample);
        self.inner.on_progress(sample);
    }

    fn on_done(&mut self, done: &DoneEvent) {
        self.inner.on_done(done);
    }
}

fn run_worker<C, S, K>(
    executor: &JobExecutor<C>,
    mut job: Job,
    sink: S,
    cancel: &K,
    shared: &Arc<Shared>,
) where
    C: SolutionCodec,
    S: ProgressSink,
    K: CancelSignal,
{
    let mut recording = Recording {
        shared: Arc::clone(shared),
        inner: sink,
    };
    if let Err(error) = executor.execute(&mut job, &mut recording, cancel) {
        log::warn!("job {} ended with an error: {error}", job.id());
    }
    shared.finish(|view| {
        view.status = job.status();
        view.history = job.history().to_vec();
        view.result = job.result().cloned();
        view.error = job.error().map(ToString::to_string);
    });
}

fn join(id: JobId, handle: JoinHandle<()>, shared: &Shared) -> Result<(), ManagerError> {
    if handle.join().is_err() {
        shared.finish(|view| {
            view.status = JobStatus::Failed;
            view.error = Some("worker panicked".to_owned());
        });
        return Err(ManagerError::WorkerPanicked(id));
    }
    Ok(())
}

/// A poisoned lock only means another worker panicked mid-update; the data
/// is still a consistent snapshot.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
