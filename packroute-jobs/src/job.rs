//! Job identity and lifecycle.
//!
//! A [`Job`] moves through `Pending → Running → Completed | Cancelled |
//! Failed`. The state is a tagged enum, so a completed job always carries its
//! result and a failed job always carries its error. Terminal states are
//! final.

use std::fmt;
use std::time::Instant;

use packroute_core::{
    ConvergenceSample, Instance, OptimizationConfig, OptimizationResult, OptimizeError,
};
use thiserror::Error;
use uuid::Uuid;

/// Unique job identifier (random UUID v4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct JobId(Uuid);

impl JobId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Payload-free view of a [`JobState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum JobStatus {
    /// Submitted, not started.
    Pending,
    /// Iterating.
    Running,
    /// Finished the full iteration budget.
    Completed,
    /// Stopped by an unrecoverable error.
    Failed,
    /// Stopped early by a cancel signal or timeout.
    Cancelled,
}

impl JobStatus {
    /// Whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

/// Lifecycle state with the data each state owns.
#[derive(Debug, Clone, PartialEq)]
pub enum JobState {
    /// Submitted, not started.
    Pending,
    /// Iterating since `started_at`.
    Running {
        /// When the run began.
        started_at: Instant,
    },
    /// Finished normally.
    Completed {
        /// Final result.
        result: OptimizationResult,
    },
    /// Rejected or aborted.
    Failed {
        /// Why the run failed.
        error: OptimizeError,
    },
    /// Stopped early; the result holds the best solution found so far.
    Cancelled {
        /// Best-so-far result.
        result: OptimizationResult,
    },
}

impl JobState {
    /// Payload-free status.
    #[must_use]
    pub const fn status(&self) -> JobStatus {
        match self {
            Self::Pending => JobStatus::Pending,
            Self::Running { .. } => JobStatus::Running,
            Self::Completed { .. } => JobStatus::Completed,
            Self::Failed { .. } => JobStatus::Failed,
            Self::Cancelled { .. } => JobStatus::Cancelled,
        }
    }
}

/// An illegal lifecycle transition was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot move job from {from} to {to}")]
pub struct TransitionError {
    /// State the job was in.
    pub from: JobStatus,
    /// State that was requested.
    pub to: JobStatus,
}

/// One optimization request and everything observed while running it.
#[derive(Debug, Clone)]
pub struct Job {
    id: JobId,
    instance: Instance,
    config: OptimizationConfig,
    state: JobState,
    history: Vec<ConvergenceSample>,
}

impl Job {
    /// Create a pending job with a fresh id.
    #[must_use]
    pub fn new(instance: Instance, config: OptimizationConfig) -> Self {
        Self::with_id(JobId::new(), instance, config)
    }

    /// Create a pending job with a caller-chosen id.
    #[must_use]
    pub const fn with_id(id: JobId, instance: Instance, config: OptimizationConfig) -> Self {
        Self {
            id,
            instance,
            config,
            state: JobState::Pending,
            history: Vec::new(),
        }
    }

    /// Job identifier.
    #[must_use]
    pub const fn id(&self) -> JobId {
        self.id
    }

    /// The instance being solved.
    #[must_use]
    pub const fn instance(&self) -> &Instance {
        &self.instance
    }

    /// Search parameters.
    #[must_use]
    pub const fn config(&self) -> &OptimizationConfig {
        &self.config
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &JobState {
        &self.state
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> JobStatus {
        self.state.status()
    }

    /// Samples recorded so far.
    #[must_use]
    pub fn history(&self) -> &[ConvergenceSample] {
        &self.history
    }

    /// Final or best-so-far result, once the job has one.
    #[must_use]
    pub const fn result(&self) -> Option<&OptimizationResult> {
        match &self.state {
            JobState::Completed { result } | JobState::Cancelled { result } => Some(result),
            _ => None,
        }
    }

    /// Failure reason, if the job failed.
    #[must_use]
    pub const fn error(&self) -> Option<&OptimizeError> {
        match &self.state {
            JobState::Failed { error } => Some(error),
            _ => None,
        }
    }

    /// `Pending → Running`.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] unless the job is pending.
    pub fn start(&mut self) -> Result<(), TransitionError> {
        self.transition(JobStatus::Pending, JobState::Running {
            started_at: Instant::now(),
        })
    }

    /// Append a sample observed while running.
    pub fn record(&mut self, sample: ConvergenceSample) {
        self.history.push(sample);
    }

    /// `Running → Completed`.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] unless the job is running.
    pub fn complete(&mut self, result: OptimizationResult) -> Result<(), TransitionError> {
        self.transition(JobStatus::Running, JobState::Completed { result })
    }

    /// `Running → Cancelled`, keeping the best-so-far result.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] unless the job is running.
    pub fn cancel(&mut self, result: OptimizationResult) -> Result<(), TransitionError> {
        self.transition(JobStatus::Running, JobState::Cancelled { result })
    }

    /// `Running → Failed`.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] unless the job is running.
    pub fn fail(&mut self, error: OptimizeError) -> Result<(), TransitionError> {
        self.transition(JobStatus::Running, JobState::Failed { error })
    }

    fn transition(&mut self, expected: JobStatus, next: JobState) -> Result<(), TransitionError> {
        let from = self.status();
        if from != expected {
            return Err(TransitionError {
                from,
                to: next.status(),
            });
        }
        log::debug!("job {} moved from {from} to {}", self.id, next.status());
        self.state = next;
        Ok(())
    }
}
