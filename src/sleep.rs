// Author: Jacques Murray

//! Runtime-agnostic timer behind the default [`SleepBlock`](crate::SleepBlock).
//!
//! The `tokio-timer` and `async-std-timer` feature flags pick the runtime
//! whose timer is used. Tokio wins if both are enabled.

use std::time::Duration;

/// Suspends the current task for `duration` without blocking the thread.
///
/// Will produce a compile error if no timer feature is enabled.
pub(crate) async fn sleep(duration: Duration) {
    cfg_if::cfg_if! {
        if #[cfg(feature = "tokio-timer")] {
            tokio::time::sleep(duration).await;
        } else if #[cfg(feature = "async-std-timer")] {
            async_std::task::sleep(duration).await;
        } else {
            // Force the user to choose a runtime.
            compile_error!("No async timer feature enabled. Please enable 'tokio-timer' or 'async-std-timer'.");
        }
    }
}
