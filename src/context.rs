// Author: Jacques Murray

//! Per-call retry state.
//!
//! A [`RetryContext`] is built fresh for every call to
//! [`Retryer::retry`](crate::Retryer::retry) and is owned by the engine loop
//! until that call returns. It is never shared, so it needs no locking; the
//! policies it points at are shared and must be `Send + Sync`.

use crate::attempt::RetryAttempt;
use crate::block::{Block, SleepBlock};
use crate::condition::{AnyCondition, Never};
use crate::listener::{Listener, NoListener};
use crate::recover::{NoRecover, Recover};
use crate::stop::{MaxAttempt, Stop};
use crate::wait::{NoWait, WaitSum};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// The six policies driving a retry, behind shared handles.
///
/// Conditions and waits are kept as explicit unions and sums so more can be
/// added. Cloning copies the handles, not the policies.
pub(crate) struct Policies<T, E> {
    pub(crate) condition: AnyCondition<T, E>,
    pub(crate) wait: WaitSum<T, E>,
    pub(crate) stop: Arc<dyn Stop<T, E>>,
    pub(crate) block: Arc<dyn Block>,
    pub(crate) listener: Arc<dyn Listener<T, E>>,
    pub(crate) recover: Arc<dyn Recover<T, E>>,
}

impl<T, E> Default for Policies<T, E> {
    fn default() -> Self {
        Self {
            condition: AnyCondition::new().or(Never),
            wait: WaitSum::new().and(NoWait),
            stop: Arc::new(MaxAttempt::default()),
            block: Arc::new(SleepBlock),
            listener: Arc::new(NoListener),
            recover: Arc::new(NoRecover),
        }
    }
}

impl<T, E> Clone for Policies<T, E> {
    fn clone(&self) -> Self {
        Self {
            condition: self.condition.clone(),
            wait: self.wait.clone(),
            stop: Arc::clone(&self.stop),
            block: Arc::clone(&self.block),
            listener: Arc::clone(&self.listener),
            recover: Arc::clone(&self.recover),
        }
    }
}

/// The operation being retried, its policies, and what has happened so far.
pub(crate) struct RetryContext<O, T, E> {
    operation: O,
    pub(crate) policies: Policies<T, E>,
    attempts: u32,
    started: Instant,
    waited: Duration,
}

impl<O, F, T, E> RetryContext<O, T, E>
where
    O: FnMut() -> F,
    F: Future<Output = Result<T, E>>,
{
    /// Wraps `operation`. The elapsed-time clock starts now.
    pub(crate) fn new(operation: O, policies: Policies<T, E>) -> Self {
        Self {
            operation,
            policies,
            attempts: 0,
            started: Instant::now(),
            waited: Duration::ZERO,
        }
    }

    /// Runs the operation once and snapshots the outcome as the next
    /// numbered attempt. The index saturates at `u32::MAX`.
    pub(crate) async fn invoke(&mut self) -> RetryAttempt<T, E> {
        self.attempts = self.attempts.saturating_add(1);
        let outcome = (self.operation)().await;
        RetryAttempt::new(self.attempts, outcome, self.started.elapsed())
    }
}

#[cfg_attr(not(feature = "logging"), allow(dead_code))]
impl<O, T, E> RetryContext<O, T, E> {
    /// Number of attempts made so far.
    pub(crate) fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Total time handed to the block policy so far.
    pub(crate) fn waited(&self) -> Duration {
        self.waited
    }
}

impl<O, T, E> RetryContext<O, T, E> {
    /// Pauses with the block policy and accounts for the time.
    pub(crate) async fn block(&mut self, duration: Duration) {
        self.policies.block.block(duration).await;
        self.waited = self.waited.saturating_add(duration);
    }
}
