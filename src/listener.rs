// Author: Jacques Murray

//! Defines the `Listener` trait and built-in listeners.
//!
//! The retry loop itself stays silent; observing attempts is the job of a
//! listener. It runs after every attempt, successful or not, before the
//! stop/retry decision and before any recovery.

use crate::attempt::RetryAttempt;
use std::fmt;
use std::sync::Arc;

/// Trait for attempt observers.
///
/// Panics raised by a listener are not caught and abort the retry.
///
/// Any `Fn(&RetryAttempt<T, E>)` closure is a listener.
pub trait Listener<T, E>: Send + Sync {
    fn listen(&self, attempt: &RetryAttempt<T, E>);
}

impl<T, E, F> Listener<T, E> for F
where
    F: Fn(&RetryAttempt<T, E>) + Send + Sync,
{
    fn listen(&self, attempt: &RetryAttempt<T, E>) {
        self(attempt)
    }
}

/// Ignores every attempt. This is the default listener.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoListener;

impl<T, E> Listener<T, E> for NoListener {
    fn listen(&self, _: &RetryAttempt<T, E>) {}
}

/// Notifies several listeners in the order they were added.
pub struct Listeners<T, E> {
    listeners: Vec<Arc<dyn Listener<T, E>>>,
}

impl<T, E> Listeners<T, E> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Appends a listener.
    pub fn and<L>(mut self, listener: L) -> Self
    where
        L: Listener<T, E> + 'static,
    {
        self.listeners.push(Arc::new(listener));
        self
    }
}

impl<T, E> Default for Listeners<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> Clone for Listeners<T, E> {
    fn clone(&self) -> Self {
        Self {
            listeners: self.listeners.clone(),
        }
    }
}

impl<T, E> fmt::Debug for Listeners<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<T, E> Listener<T, E> for Listeners<T, E> {
    fn listen(&self, attempt: &RetryAttempt<T, E>) {
        for listener in &self.listeners {
            listener.listen(attempt);
        }
    }
}

/// Reports every attempt through the `log` facade.
///
/// Successes are logged at `trace`, failures at `warn`.
/// Requires the `logging` feature flag.
#[cfg(feature = "logging")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LogListener;

#[cfg(feature = "logging")]
impl<T, E> Listener<T, E> for LogListener
where
    E: fmt::Display,
{
    fn listen(&self, attempt: &RetryAttempt<T, E>) {
        match attempt.error() {
            None => log::trace!(
                "Operation succeeded on attempt {} after {:?}",
                attempt.attempt(),
                attempt.elapsed()
            ),
            Some(e) => log::warn!(
                "Operation failed on attempt {} with error: {}",
                attempt.attempt(),
                e
            ),
        }
    }
}
