// Author: Jacques Murray

//! Defines the `Condition` trait and built-in retry conditions.
//!
//! A condition decides whether an attempt warrants another try. It is only
//! consulted once the [`Stop`](crate::Stop) policy has allowed the loop to
//! continue. The default, [`Never`], makes retrying strictly opt-in.

use crate::attempt::RetryAttempt;
use std::fmt;
use std::sync::Arc;

/// Trait for retry conditions.
///
/// Return `true` if another attempt should be made after `attempt`.
///
/// Any `Fn(&RetryAttempt<T, E>) -> bool` closure is a condition.
pub trait Condition<T, E>: Send + Sync {
    fn condition(&self, attempt: &RetryAttempt<T, E>) -> bool;
}

impl<T, E, F> Condition<T, E> for F
where
    F: Fn(&RetryAttempt<T, E>) -> bool + Send + Sync,
{
    fn condition(&self, attempt: &RetryAttempt<T, E>) -> bool {
        self(attempt)
    }
}

/// Never retries. This is the default condition.
#[derive(Debug, Clone, Copy, Default)]
pub struct Never;

impl<T, E> Condition<T, E> for Never {
    fn condition(&self, _: &RetryAttempt<T, E>) -> bool {
        false
    }
}

/// Always retries, successful or not. Only useful together with a
/// [`Stop`](crate::Stop) policy that eventually triggers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Always;

impl<T, E> Condition<T, E> for Always {
    fn condition(&self, _: &RetryAttempt<T, E>) -> bool {
        true
    }
}

/// Retries on any failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct OnError;

impl<T, E> Condition<T, E> for OnError {
    fn condition(&self, attempt: &RetryAttempt<T, E>) -> bool {
        attempt.is_err()
    }
}

/// Retries on failures accepted by a predicate.
///
/// Successful attempts are never retried.
#[derive(Clone, Copy)]
pub struct ErrorMatches<P> {
    predicate: P,
}

impl<P> ErrorMatches<P> {
    /// Creates a condition from a predicate over the error.
    pub fn new(predicate: P) -> Self {
        Self { predicate }
    }
}

impl<P> fmt::Debug for ErrorMatches<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorMatches").finish_non_exhaustive()
    }
}

impl<T, E, P> Condition<T, E> for ErrorMatches<P>
where
    P: Fn(&E) -> bool + Send + Sync,
{
    fn condition(&self, attempt: &RetryAttempt<T, E>) -> bool {
        attempt.error().is_some_and(|e| (self.predicate)(e))
    }
}

/// Retries while a successful value is accepted by a predicate,
/// e.g. polling until a job reports completion.
///
/// Failed attempts are never retried by this condition.
#[derive(Clone, Copy)]
pub struct ResultMatches<P> {
    predicate: P,
}

impl<P> ResultMatches<P> {
    /// Creates a condition from a predicate over the produced value.
    pub fn new(predicate: P) -> Self {
        Self { predicate }
    }
}

impl<P> fmt::Debug for ResultMatches<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultMatches").finish_non_exhaustive()
    }
}

impl<T, E, P> Condition<T, E> for ResultMatches<P>
where
    P: Fn(&T) -> bool + Send + Sync,
{
    fn condition(&self, attempt: &RetryAttempt<T, E>) -> bool {
        attempt.value().is_some_and(|v| (self.predicate)(v))
    }
}

/// The union of several conditions: retries if any one of them does.
///
/// An empty union never retries.
pub struct AnyCondition<T, E> {
    conditions: Vec<Arc<dyn Condition<T, E>>>,
}

impl<T, E> AnyCondition<T, E> {
    /// Creates an empty union.
    pub fn new() -> Self {
        Self {
            conditions: Vec::new(),
        }
    }

    /// Adds a condition to the union.
    pub fn or<C>(mut self, condition: C) -> Self
    where
        C: Condition<T, E> + 'static,
    {
        self.conditions.push(Arc::new(condition));
        self
    }

    pub(crate) fn push(&mut self, condition: Arc<dyn Condition<T, E>>) {
        self.conditions.push(condition);
    }

    /// Number of conditions in the union.
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Returns `true` if the union holds no conditions.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

impl<T, E> Default for AnyCondition<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> Clone for AnyCondition<T, E> {
    fn clone(&self) -> Self {
        Self {
            conditions: self.conditions.clone(),
        }
    }
}

impl<T, E> fmt::Debug for AnyCondition<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyCondition")
            .field("conditions", &self.conditions.len())
            .finish()
    }
}

impl<T, E> Condition<T, E> for AnyCondition<T, E> {
    fn condition(&self, attempt: &RetryAttempt<T, E>) -> bool {
        self.conditions.iter().any(|c| c.condition(attempt))
    }
}
