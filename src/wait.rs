// Author: Jacques Murray

//! Defines the `Wait` trait and built-in wait strategies.
//!
//! A `Wait` computes how long to pause before the next attempt. Strategies
//! hold no per-run state: growth is derived from the attempt index, so one
//! instance can pace any number of concurrent retries.
//!
//! Several strategies are combined by summing them with [`WaitSum`].

use crate::attempt::RetryAttempt;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Trait for wait strategies.
///
/// `attempt` is the attempt that just finished; the returned duration is
/// the pause before attempt `attempt.attempt() + 1`.
///
/// Any `Fn(&RetryAttempt<T, E>) -> Duration` closure is a wait strategy.
pub trait Wait<T, E>: Send + Sync {
    fn wait_time(&self, attempt: &RetryAttempt<T, E>) -> Duration;
}

impl<T, E, F> Wait<T, E> for F
where
    F: Fn(&RetryAttempt<T, E>) -> Duration + Send + Sync,
{
    fn wait_time(&self, attempt: &RetryAttempt<T, E>) -> Duration {
        self(attempt)
    }
}

// --- No Wait ---

/// Retries immediately. This is the default wait.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoWait;

impl<T, E> Wait<T, E> for NoWait {
    fn wait_time(&self, _: &RetryAttempt<T, E>) -> Duration {
        Duration::ZERO
    }
}

// --- Fixed Delay Strategy ---

/// A wait strategy that always pauses for the same duration.
#[derive(Debug, Clone, Copy)]
pub struct FixedWait {
    duration: Duration,
}

impl FixedWait {
    /// Creates a new `FixedWait` strategy.
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }
}

impl<T, E> Wait<T, E> for FixedWait {
    fn wait_time(&self, _: &RetryAttempt<T, E>) -> Duration {
        self.duration
    }
}

// --- Linear Increase Strategy ---

/// A wait strategy that grows by a fixed step after every attempt.
///
/// Example with `initial = 100ms, step = 50ms`: 100ms, 150ms, 200ms...
#[derive(Debug, Clone, Copy)]
pub struct IncreaseWait {
    initial: Duration,
    step: Duration,
}

impl IncreaseWait {
    /// Creates a new `IncreaseWait` starting at `initial`.
    pub fn new(initial: Duration, step: Duration) -> Self {
        Self { initial, step }
    }
}

impl<T, E> Wait<T, E> for IncreaseWait {
    fn wait_time(&self, attempt: &RetryAttempt<T, E>) -> Duration {
        let steps = attempt.attempt().saturating_sub(1);
        self.initial.saturating_add(self.step.saturating_mul(steps))
    }
}

// --- Exponential Backoff Strategy ---

/// A wait strategy that doubles the pause after every attempt.
///
/// Example: 100ms, 200ms, 400ms, 800ms...
#[derive(Debug, Clone, Copy)]
pub struct ExponentialWait {
    base: Duration,
    max_delay: Option<Duration>,
}

impl ExponentialWait {
    /// Creates a new `ExponentialWait` strategy.
    ///
    /// - `base_delay`: The pause after the first attempt (e.g., 100ms).
    pub fn new(base_delay: Duration) -> Self {
        Self {
            base: base_delay,
            max_delay: None,
        }
    }

    /// Sets an optional maximum delay.
    /// The pause will not increase beyond this duration.
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = Some(max_delay);
        self
    }
}

impl<T, E> Wait<T, E> for ExponentialWait {
    fn wait_time(&self, attempt: &RetryAttempt<T, E>) -> Duration {
        let exponent = attempt.attempt().saturating_sub(1);
        // Saturate instead of panicking on very late attempts.
        let delay = match 1u32.checked_shl(exponent) {
            Some(factor) => self.base.saturating_mul(factor),
            None if self.base.is_zero() => Duration::ZERO,
            None => Duration::MAX,
        };
        match self.max_delay {
            Some(max_delay) => delay.min(max_delay),
            None => delay,
        }
    }
}

// --- Fibonacci Backoff Strategy ---

/// A wait strategy based on the Fibonacci sequence.
///
/// Example: 1s, 1s, 2s, 3s, 5s, 8s...
#[derive(Debug, Clone, Copy)]
pub struct FibonacciWait {
    base: Duration,
    max_delay: Option<Duration>,
}

impl FibonacciWait {
    /// Creates a new `FibonacciWait`.
    ///
    /// - `base_delay`: The pause after the first two attempts (e.g., 1s).
    pub fn new(base_delay: Duration) -> Self {
        Self {
            base: base_delay,
            max_delay: None,
        }
    }

    /// Sets an optional maximum delay.
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = Some(max_delay);
        self
    }
}

impl<T, E> Wait<T, E> for FibonacciWait {
    fn wait_time(&self, attempt: &RetryAttempt<T, E>) -> Duration {
        let ceiling = self.max_delay.unwrap_or(Duration::MAX);
        let mut current = self.base;
        let mut next = self.base;
        for _ in 1..attempt.attempt() {
            if current >= ceiling {
                break;
            }
            let new_next = current.saturating_add(next);
            current = next;
            next = new_next;
        }
        current.min(ceiling)
    }
}

// --- Ceiling ---

/// Caps another wait strategy at a maximum duration.
#[derive(Debug, Clone, Copy)]
pub struct Capped<W> {
    inner: W,
    max: Duration,
}

impl<W> Capped<W> {
    /// Wraps `inner`, never waiting longer than `max`.
    pub fn new(inner: W, max: Duration) -> Self {
        Self { inner, max }
    }
}

impl<T, E, W> Wait<T, E> for Capped<W>
where
    W: Wait<T, E>,
{
    fn wait_time(&self, attempt: &RetryAttempt<T, E>) -> Duration {
        self.inner.wait_time(attempt).min(self.max)
    }
}

// --- Sum ---

/// Combines several wait strategies by adding their durations.
///
/// An empty sum waits for zero time.
pub struct WaitSum<T, E> {
    waits: Vec<Arc<dyn Wait<T, E>>>,
}

impl<T, E> WaitSum<T, E> {
    /// Creates an empty sum.
    pub fn new() -> Self {
        Self { waits: Vec::new() }
    }

    /// Adds a strategy to the sum.
    pub fn and<W>(mut self, wait: W) -> Self
    where
        W: Wait<T, E> + 'static,
    {
        self.waits.push(Arc::new(wait));
        self
    }

    pub(crate) fn push(&mut self, wait: Arc<dyn Wait<T, E>>) {
        self.waits.push(wait);
    }

    /// Number of strategies in the sum.
    pub fn len(&self) -> usize {
        self.waits.len()
    }

    /// Returns `true` if the sum holds no strategies.
    pub fn is_empty(&self) -> bool {
        self.waits.is_empty()
    }
}

impl<T, E> Default for WaitSum<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> Clone for WaitSum<T, E> {
    fn clone(&self) -> Self {
        Self {
            waits: self.waits.clone(),
        }
    }
}

impl<T, E> fmt::Debug for WaitSum<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaitSum")
            .field("waits", &self.waits.len())
            .finish()
    }
}

impl<T, E> Wait<T, E> for WaitSum<T, E> {
    fn wait_time(&self, attempt: &RetryAttempt<T, E>) -> Duration {
        self.waits.iter().fold(Duration::ZERO, |total, w| {
            total.saturating_add(w.wait_time(attempt))
        })
    }
}

// --- Randomized Strategies ---

/// A wait strategy that picks a uniformly random pause in `min..=max`.
///
/// Requires the `jitter` feature flag.
#[cfg(feature = "jitter")]
#[derive(Debug, Clone, Copy)]
pub struct RandomWait {
    min: Duration,
    max: Duration,
}

#[cfg(feature = "jitter")]
impl RandomWait {
    /// Creates a new `RandomWait`. The bounds are swapped if given in
    /// the wrong order.
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }
}

#[cfg(feature = "jitter")]
impl<T, E> Wait<T, E> for RandomWait {
    fn wait_time(&self, _: &RetryAttempt<T, E>) -> Duration {
        use rand::Rng;
        let nanos = rand::thread_rng().gen_range(self.min.as_nanos()..=self.max.as_nanos());
        duration_from_nanos(nanos)
    }
}

/// A wrapper that adds random jitter to any `Wait` strategy.
///
/// This is crucial for production systems to prevent the "thundering herd"
/// problem. It requires the `jitter` feature flag.
#[cfg(feature = "jitter")]
#[derive(Debug, Clone, Copy)]
pub struct Jitter<W> {
    inner: W,
}

#[cfg(feature = "jitter")]
impl<W> Jitter<W> {
    /// Wraps a `Wait` strategy to add full jitter.
    ///
    /// The pause becomes a random duration between 0 and the
    /// duration provided by the inner strategy.
    pub fn new(inner: W) -> Self {
        Self { inner }
    }
}

#[cfg(feature = "jitter")]
impl<T, E, W> Wait<T, E> for Jitter<W>
where
    W: Wait<T, E>,
{
    fn wait_time(&self, attempt: &RetryAttempt<T, E>) -> Duration {
        use rand::Rng;
        let duration = self.inner.wait_time(attempt);
        // Full jitter: 0..=duration
        let nanos = rand::thread_rng().gen_range(0..=duration.as_nanos());
        duration_from_nanos(nanos)
    }
}

/// Converts a sampled nanosecond count back into a `Duration`, saturating at
/// `Duration::MAX`.
#[cfg(feature = "jitter")]
fn duration_from_nanos(nanos: u128) -> Duration {
    const NANOS_PER_SEC: u128 = 1_000_000_000;
    match u64::try_from(nanos / NANOS_PER_SEC) {
        Ok(secs) => Duration::new(secs, (nanos % NANOS_PER_SEC) as u32),
        Err(_) => Duration::MAX,
    }
}
