// Author: Jacques Murray

//! Defines the `Stop` trait and built-in stop policies.
//!
//! A stop policy ends the retry loop regardless of what the
//! [`Condition`](crate::Condition) says. It is evaluated first, after every
//! attempt.

use crate::attempt::RetryAttempt;
use crate::error::ConfigError;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// The number of attempts allowed when nothing else is configured.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Trait for stop policies.
///
/// Return `true` to end the retry loop after `attempt`.
///
/// Any `Fn(&RetryAttempt<T, E>) -> bool` closure is a stop policy.
pub trait Stop<T, E>: Send + Sync {
    fn stop(&self, attempt: &RetryAttempt<T, E>) -> bool;
}

impl<T, E, F> Stop<T, E> for F
where
    F: Fn(&RetryAttempt<T, E>) -> bool + Send + Sync,
{
    fn stop(&self, attempt: &RetryAttempt<T, E>) -> bool {
        self(attempt)
    }
}

/// Stops once a given number of attempts have been made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxAttempt {
    max_attempts: u32,
}

impl MaxAttempt {
    /// Creates a policy allowing at most `max_attempts` invocations.
    ///
    /// Returns [`ConfigError::ZeroMaxAttempts`] for zero, since the
    /// operation always runs at least once.
    pub fn new(max_attempts: u32) -> Result<Self, ConfigError> {
        if max_attempts == 0 {
            return Err(ConfigError::ZeroMaxAttempts);
        }
        Ok(Self { max_attempts })
    }

    /// The configured attempt limit.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

impl Default for MaxAttempt {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl<T, E> Stop<T, E> for MaxAttempt {
    fn stop(&self, attempt: &RetryAttempt<T, E>) -> bool {
        attempt.attempt() >= self.max_attempts
    }
}

/// Stops once the time since the first attempt reaches a budget.
///
/// The check happens after an attempt completes, so the total time can
/// overshoot the budget by one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxElapsed {
    max_elapsed: Duration,
}

impl MaxElapsed {
    /// Creates a policy that stops once `max_elapsed` has passed since the
    /// first attempt started.
    pub fn new(max_elapsed: Duration) -> Self {
        Self { max_elapsed }
    }
}

impl<T, E> Stop<T, E> for MaxElapsed {
    fn stop(&self, attempt: &RetryAttempt<T, E>) -> bool {
        attempt.elapsed() >= self.max_elapsed
    }
}

/// Stops as soon as any of several policies does.
///
/// An empty set never stops.
pub struct AnyStop<T, E> {
    stops: Vec<Arc<dyn Stop<T, E>>>,
}

impl<T, E> AnyStop<T, E> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self { stops: Vec::new() }
    }

    /// Adds a policy to the set.
    pub fn or<S>(mut self, stop: S) -> Self
    where
        S: Stop<T, E> + 'static,
    {
        self.stops.push(Arc::new(stop));
        self
    }
}

impl<T, E> Default for AnyStop<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> Clone for AnyStop<T, E> {
    fn clone(&self) -> Self {
        Self {
            stops: self.stops.clone(),
        }
    }
}

impl<T, E> fmt::Debug for AnyStop<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyStop")
            .field("stops", &self.stops.len())
            .finish()
    }
}

impl<T, E> Stop<T, E> for AnyStop<T, E> {
    fn stop(&self, attempt: &RetryAttempt<T, E>) -> bool {
        self.stops.iter().any(|s| s.stop(attempt))
    }
}
