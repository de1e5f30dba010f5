// Author: Jacques Murray

//! Defines [`RetryAttempt`], the snapshot every policy is evaluated against.

use std::time::Duration;

/// The outcome of a single invocation of the operation.
///
/// A new `RetryAttempt` is produced for every attempt and never mutated
/// afterwards. Policies only ever see it by reference, except for
/// [`Recover`](crate::Recover) which receives the terminal attempt by value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryAttempt<T, E> {
    attempt: u32,
    outcome: Result<T, E>,
    elapsed: Duration,
}

impl<T, E> RetryAttempt<T, E> {
    /// Creates a new attempt snapshot.
    ///
    /// - `attempt`: The 1-based index of this attempt.
    /// - `outcome`: What the operation returned.
    /// - `elapsed`: Time since the first attempt started.
    pub fn new(attempt: u32, outcome: Result<T, E>, elapsed: Duration) -> Self {
        Self {
            attempt,
            outcome,
            elapsed,
        }
    }

    /// The 1-based index of this attempt.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Time elapsed between the start of the first attempt and the
    /// completion of this one.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// The result the operation returned.
    pub fn outcome(&self) -> &Result<T, E> {
        &self.outcome
    }

    /// The produced value, if the attempt succeeded.
    pub fn value(&self) -> Option<&T> {
        self.outcome.as_ref().ok()
    }

    /// The failure, if the attempt failed.
    pub fn error(&self) -> Option<&E> {
        self.outcome.as_ref().err()
    }

    /// Returns `true` if the attempt succeeded.
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Returns `true` if the attempt failed.
    pub fn is_err(&self) -> bool {
        self.outcome.is_err()
    }

    /// Consumes the attempt, returning the operation's outcome.
    pub fn into_outcome(self) -> Result<T, E> {
        self.outcome
    }

    /// Consumes the attempt, returning the failure if there was one.
    pub fn into_error(self) -> Option<E> {
        self.outcome.err()
    }
}
