//! Progress sinks receiving streamed samples and the final done event.
//!
//! A streaming run pushes every recorded [`ConvergenceSample`] in iteration
//! order and then exactly one [`DoneEvent`]. Sinks know nothing about wire
//! formats; transports adapt [`ProgressEvent`] to their own framing.

use std::sync::mpsc::Sender;

use packroute_core::{ConvergenceSample, OptimizationResult, RouteSummary};

use crate::JobStatus;

/// Terminal event of a streaming run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DoneEvent {
    /// `Completed` or `Cancelled`.
    pub status: JobStatus,
    /// Depot-bounded routes of the best solution.
    pub routes: Vec<Vec<u64>>,
    /// Fitness of `routes`.
    pub best_fitness: f64,
    /// Wall-clock time of the run.
    pub runtime_seconds: f64,
    /// Iterations performed before the run ended.
    pub iterations_completed: u32,
    /// Per-route distance and load.
    pub route_details: Vec<RouteSummary>,
}

impl DoneEvent {
    /// Summarise a result for the done event.
    #[must_use]
    pub fn new(result: &OptimizationResult, status: JobStatus) -> Self {
        Self {
            status,
            routes: result.routes.clone(),
            best_fitness: result.best_fitness,
            runtime_seconds: result.runtime_seconds,
            iterations_completed: result.iterations_completed,
            route_details: result.route_details.clone(),
        }
    }
}

/// Everything a streaming run emits, in emission order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "event", rename_all = "snake_case"))]
pub enum ProgressEvent {
    /// A convergence sample.
    Progress(ConvergenceSample),
    /// The final event.
    Done(DoneEvent),
}

impl ProgressEvent {
    /// Whether this is the terminal event.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }
}

/// Receiver of streamed progress.
pub trait ProgressSink {
    /// Called for every recorded sample, in increasing iteration order.
    fn on_progress(&mut self, sample: ConvergenceSample);

    /// Called once, after the last sample.
    fn on_done(&mut self, done: &DoneEvent);
}

impl<S> ProgressSink for &mut S
where
    S: ProgressSink + ?Sized,
{
    fn on_progress(&mut self, sample: ConvergenceSample) {
        (**self).on_progress(sample);
    }

    fn on_done(&mut self, done: &DoneEvent) {
        (**self).on_done(done);
    }
}

impl<S> ProgressSink for Box<S>
where
    S: ProgressSink + ?Sized,
{
    fn on_progress(&mut self, sample: ConvergenceSample) {
        (**self).on_progress(sample);
    }

    fn on_done(&mut self, done: &DoneEvent) {
        (**self).on_done(done);
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn on_progress(&mut self, _sample: ConvergenceSample) {}

    fn on_done(&mut self, _done: &DoneEvent) {}
}

/// Collects events in memory.
impl ProgressSink for Vec<ProgressEvent> {
    fn on_progress(&mut self, sample: ConvergenceSample) {
        self.push(ProgressEvent::Progress(sample));
    }

    fn on_done(&mut self, done: &DoneEvent) {
        self.push(ProgressEvent::Done(done.clone()));
    }
}

/// Forwards events over a channel; a dropped receiver is not an error.
impl ProgressSink for Sender<ProgressEvent> {
    fn on_progress(&mut self, sample: ConvergenceSample) {
        if self.send(ProgressEvent::Progress(sample)).is_err() {
            log::debug!("progress receiver dropped at iteration {}", sample.iteration);
        }
    }

    fn on_done(&mut self, done: &DoneEvent) {
        if self.send(ProgressEvent::Done(done.clone())).is_err() {
            log::debug!("progress receiver dropped before the done event");
        }
    }
}

/// Adapts a pair of closures into a [`ProgressSink`].
///
/// # Examples
/// ```
/// use packroute_core::ConvergenceSample;
/// use packroute_jobs::{FnSink, ProgressSink};
///
/// let mut seen = Vec::new();
/// let mut sink = FnSink::new(|sample: ConvergenceSample| seen.push(sample.iteration), |_| {});
/// sink.on_progress(ConvergenceSample::new(3, 1.5));
/// drop(sink);
/// assert_eq!(seen, vec![3]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FnSink<P, D> {
    on_progress: P,
    on_done: D,
}

impl<P, D> FnSink<P, D>
where
    P: FnMut(ConvergenceSample),
    D: FnMut(&DoneEvent),
{
    /// Wrap the two callbacks.
    #[must_use]
    pub const fn new(on_progress: P, on_done: D) -> Self {
        Self {
            on_progress,
            on_done,
        }
    }
}

impl<P, D> ProgressSink for FnSink<P, D>
where
    P: FnMut(ConvergenceSample),
    D: FnMut(&DoneEvent),
{
    fn on_progress(&mut self, sample: ConvergenceSample) {
        (self.on_progress)(sample);
    }

    fn on_done(&mut self, done: &DoneEvent) {
        (self.on_done)(done);
    }
}
