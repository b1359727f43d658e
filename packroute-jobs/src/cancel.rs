//! Cooperative cancellation signals checked between iterations.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Polled by the executor before each iteration.
///
/// Cancellation is cooperative: a run notices it at the next iteration
/// boundary, so it takes effect with at most one iteration of latency.
pub trait CancelSignal: Send + Sync {
    /// Whether the run should stop.
    fn is_cancelled(&self) -> bool;
}

impl<S> CancelSignal for &S
where
    S: CancelSignal + ?Sized,
{
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

impl<S> CancelSignal for Arc<S>
where
    S: CancelSignal + ?Sized,
{
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

/// An absent signal never fires.
impl<S> CancelSignal for Option<S>
where
    S: CancelSignal,
{
    fn is_cancelled(&self) -> bool {
        self.as_ref().is_some_and(S::is_cancelled)
    }
}

/// A signal that never fires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NeverCancel;

impl CancelSignal for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Shared flag that any clone can raise.
///
/// # Examples
/// ```
/// use packroute_jobs::{CancelSignal, CancellationToken};
///
/// let token = CancellationToken::new();
/// let handle = token.clone();
/// handle.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create an unraised token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag for every clone.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }
}

impl CancelSignal for CancellationToken {
    fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Adapts a `Fn() -> bool` predicate into a [`CancelSignal`].
#[derive(Debug, Clone, Copy)]
pub struct CancelWhen<F>(pub F);

impl<F> CancelSignal for CancelWhen<F>
where
    F: Fn() -> bool + Send + Sync,
{
    fn is_cancelled(&self) -> bool {
        (self.0)()
    }
}

/// Fires when the inner signal does or when a time budget runs out.
///
/// This is the timeout watchdog: it reuses the cancellation path, so a
/// timed-out run ends `Cancelled` with its best-so-far result.
#[derive(Debug, Clone)]
pub struct Deadline<K> {
    inner: K,
    started_at: Instant,
    budget: Duration,
}

impl<K> Deadline<K> {
    /// Start a budget of `budget` from now.
    #[must_use]
    pub fn new(inner: K, budget: Duration) -> Self {
        Self::starting_at(inner, Instant::now(), budget)
    }

    /// Start a budget from an explicit instant.
    #[must_use]
    pub const fn starting_at(inner: K, started_at: Instant, budget: Duration) -> Self {
        Self {
            inner,
            started_at,
            budget,
        }
    }

    /// Whether the budget alone has run out.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.started_at.elapsed() >= self.budget
    }
}

impl<K> CancelSignal for Deadline<K>
where
    K: CancelSignal,
{
    fn is_cancelled(&self) -> bool {
        self.inner.is_cancelled() || self.is_expired()
    }
}
