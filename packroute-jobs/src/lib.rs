//! Job execution for packroute searches.
//!
//! A run can be driven two ways. [`run_sync`] blocks until the iteration
//! budget is spent and returns the result. [`run_streaming`] pushes every
//! recorded convergence sample to a [`ProgressSink`] and finishes with one
//! [`DoneEvent`], polling a [`CancelSignal`] between iterations. Timeouts
//! are a [`Deadline`] wrapped around any other signal.
//!
//! [`Job`] tracks one request through its lifecycle and [`JobManager`] runs
//! many of them on worker threads.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod cancel;
mod executor;
mod job;
mod manager;
mod sink;

pub use cancel::{CancelSignal, CancelWhen, CancellationToken, Deadline, NeverCancel};
pub use executor::{JobError, JobExecutor, StreamOutcome, run_streaming, run_sync};
pub use job::{Job, JobId, JobState, JobStatus, TransitionError};
pub use manager::{JobManager, JobSnapshot, ManagerError};
pub use sink::{DoneEvent, FnSink, NullSink, ProgressEvent, ProgressSink};
