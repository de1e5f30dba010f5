// Author: Jacques Murray

//! Defines the `Recover` trait: what to return once retrying gives up on a
//! failure.

use crate::attempt::RetryAttempt;

/// Trait for recovery policies.
///
/// Called exactly once, with the terminal attempt, and only if that attempt
/// failed. Return `Ok` to substitute a fallback value or `Err` to surface a
/// failure to the caller.
///
/// Any `Fn(RetryAttempt<T, E>) -> Result<T, E>` closure is a recovery policy.
pub trait Recover<T, E>: Send + Sync {
    fn recover(&self, attempt: RetryAttempt<T, E>) -> Result<T, E>;
}

impl<T, E, F> Recover<T, E> for F
where
    F: Fn(RetryAttempt<T, E>) -> Result<T, E> + Send + Sync,
{
    fn recover(&self, attempt: RetryAttempt<T, E>) -> Result<T, E> {
        self(attempt)
    }
}

/// Surfaces the terminal failure unchanged. This is the default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRecover;

impl<T, E> Recover<T, E> for NoRecover {
    fn recover(&self, attempt: RetryAttempt<T, E>) -> Result<T, E> {
        attempt.into_outcome()
    }
}

/// Replaces the terminal failure with a fixed value.
#[derive(Debug, Clone)]
pub struct Fallback<T> {
    value: T,
}

impl<T> Fallback<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }
}

impl<T, E> Recover<T, E> for Fallback<T>
where
    T: Clone + Send + Sync,
{
    fn recover(&self, _: RetryAttempt<T, E>) -> Result<T, E> {
        Ok(self.value.clone())
    }
}
