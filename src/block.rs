// Author: Jacques Murray

//! Defines the `Block` trait: how the retry loop pauses between attempts.
//!
//! Blocking is the only suspension point of a retry. The default,
//! [`SleepBlock`], awaits the runtime timer, so a pause never stalls other
//! tasks sharing the scheduler.

use crate::sleep;
use futures_core::future::BoxFuture;
use std::time::Duration;

/// Trait for pausing between attempts.
///
/// Called once between every pair of attempts with the combined
/// [`Wait`](crate::Wait) duration, including zero.
pub trait Block: Send + Sync {
    fn block(&self, duration: Duration) -> BoxFuture<'_, ()>;
}

/// Sleeps on the timer of the runtime selected by feature flag.
/// This is the default block.
#[derive(Debug, Clone, Copy, Default)]
pub struct SleepBlock;

impl Block for SleepBlock {
    fn block(&self, duration: Duration) -> BoxFuture<'_, ()> {
        Box::pin(sleep::sleep(duration))
    }
}

/// Does not pause at all, whatever the requested duration.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBlock;

impl Block for NoBlock {
    fn block(&self, _: Duration) -> BoxFuture<'_, ()> {
        Box::pin(std::future::ready(()))
    }
}
