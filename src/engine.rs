// Author: Jacques Murray

//! The retry loop.
//!
//! Each iteration runs the operation, notifies the listener, then decides:
//!
//! 1. `Stop` says stop: the attempt is terminal, whatever the condition says.
//! 2. `Condition` says no: the attempt is terminal.
//! 3. Otherwise the summed `Wait` is handed to `Block` and the loop goes on.
//!
//! A terminal success is returned as is. A terminal failure goes through
//! `Recover`, exactly once.

use crate::attempt::RetryAttempt;
use crate::condition::Condition;
use crate::context::RetryContext;
use crate::listener::Listener;
use crate::recover::Recover;
use crate::stop::Stop;
use crate::wait::Wait;
use std::future::Future;

/// What to do after an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    /// The stop policy triggered.
    Stopped,
    /// The condition declined another attempt.
    Declined,
    Retry,
}

fn judge<O, T, E>(context: &RetryContext<O, T, E>, attempt: &RetryAttempt<T, E>) -> Verdict {
    if context.policies.stop.stop(attempt) {
        Verdict::Stopped
    } else if context.policies.condition.condition(attempt) {
        Verdict::Retry
    } else {
        Verdict::Declined
    }
}

/// Drives `context` until an attempt is terminal and returns its outcome,
/// recovered if it failed.
pub(crate) async fn execute<O, F, T, E>(mut context: RetryContext<O, T, E>) -> Result<T, E>
where
    O: FnMut() -> F,
    F: Future<Output = Result<T, E>>,
{
    loop {
        let attempt = context.invoke().await;
        context.policies.listener.listen(&attempt);

        let verdict = judge(&context, &attempt);
        if verdict == Verdict::Retry {
            let delay = context.policies.wait.wait_time(&attempt);
            drop(attempt);

            #[cfg(feature = "logging")]
            log::trace!(
                "Retrying after delay of {:?} (attempt {})",
                delay,
                context.attempts()
            );
            context.block(delay).await;
            continue;
        }

        #[cfg(feature = "logging")]
        log::debug!(
            "Retry loop finished ({:?}) after {} attempts, {:?} spent waiting",
            verdict,
            context.attempts(),
            context.waited()
        );

        return if attempt.is_err() {
            context.policies.recover.recover(attempt)
        } else {
            attempt.into_outcome()
        };
    }
}
