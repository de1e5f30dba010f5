// Author: Jacques Murray

//! # retryer
//!
//! A library for retrying asynchronous operations, where every retry
//! decision is made by a small, pluggable policy.
//!
//! ## Goals
//!
//! * Provide a simple, ergonomic API for retrying `async` operations.
//! * Split the retry decision into independent policies: *whether* to retry
//!   ([`Condition`]), *how long* to wait ([`Wait`]), *when* to give up
//!   ([`Stop`]), *how* to pause ([`Block`]), *who* is told ([`Listener`]) and
//!   *what* to return after giving up ([`Recover`]).
//! * Be runtime-agnostic (supports Tokio and async-std via feature flags).
//!
//! Retrying is opt-in: with nothing configured the operation runs exactly
//! once and its error is returned unchanged.
//!
//! ## Quick Start
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! retryer = "0.1"
//! tokio = { version = "1", features = ["full"] }
//! ```
//!
//! **Note:** Exactly one timer feature should be enabled:
//! `tokio-timer` (the default) or `async-std-timer`.
//!
//! ### Example: Retry on Failure
//!
//! ```rust,no_run
//! use retryer::{ExponentialWait, OnError, Retryer};
//! use std::time::Duration;
//!
//! // A mock function that might fail
//! async fn fetch_data() -> Result<String, String> {
//!     // ... logic that might fail
//!     Err("Failed to connect".to_string())
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let retryer = Retryer::new()
//!         .condition(OnError)
//!         .wait(ExponentialWait::new(Duration::from_millis(100)))
//!         .max_attempt(5)?;
//!
//!     match retryer.retry(|| async { fetch_data().await }).await {
//!         Ok(data) => println!("Succeeded: {}", data),
//!         Err(e) => println!("Failed after retries: {}", e),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ### Example: Conditional Retry with Recovery
//!
//! ```rust,no_run
//! use retryer::{ErrorMatches, Fallback, FixedWait, Retryer};
//! use std::time::Duration;
//!
//! // Define a custom error
//! #[derive(Debug, Clone)]
//! enum MyError {
//!     TransientNetworkError,
//!     PermanentAuthError,
//! }
//!
//! async fn fetch_sensitive_data() -> Result<String, MyError> {
//!     // ...
//!     Err(MyError::TransientNetworkError)
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     // Only retry on transient errors, serve a cached value once exhausted.
//!     let retryer = Retryer::new()
//!         .condition(ErrorMatches::new(|e: &MyError| {
//!             matches!(e, MyError::TransientNetworkError)
//!         }))
//!         .wait(FixedWait::new(Duration::from_millis(200)))
//!         .recover(Fallback::new("cached".to_string()));
//!
//!     let result = retryer.retry(|| async { fetch_sensitive_data().await }).await;
//!
//!     if let Err(MyError::PermanentAuthError) = result {
//!         println!("Failed immediately due to auth error.");
//!     }
//! }
//! ```

// Public modules
pub mod attempt;
pub mod block;
pub mod condition;
mod context;
mod engine;
pub mod error;
pub mod listener;
pub mod recover;
mod sleep;
pub mod stop;
pub mod wait;

// Public re-exports for easier use
pub use attempt::RetryAttempt;
pub use block::{Block, NoBlock, SleepBlock};
pub use condition::{Always, AnyCondition, Condition, ErrorMatches, Never, OnError, ResultMatches};
pub use error::ConfigError;
pub use listener::{Listener, Listeners, NoListener};
pub use recover::{Fallback, NoRecover, Recover};
pub use stop::{AnyStop, MaxAttempt, MaxElapsed, Stop, DEFAULT_MAX_ATTEMPTS};
pub use wait::{
    Capped, ExponentialWait, FibonacciWait, FixedWait, IncreaseWait, NoWait, Wait, WaitSum,
};

#[cfg(feature = "jitter")]
pub use wait::{Jitter, RandomWait};

#[cfg(feature = "logging")]
pub use listener::LogListener;

use context::{Policies, RetryContext};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// The entry point: a set of retry policies that can run any number of
/// operations.
///
/// Configure it with the builder-style methods, then call
/// [`retry()`](Retryer::retry) as often as needed. Configuration takes the
/// `Retryer` by value and is single-owner; once built, a `Retryer` can be
/// shared (e.g. behind an `Arc`) and used from many tasks at once.
///
/// Defaults:
/// - condition: [`Never`] (no retries)
/// - wait: [`NoWait`]
/// - stop: [`MaxAttempt`] of [`DEFAULT_MAX_ATTEMPTS`]
/// - block: [`SleepBlock`]
/// - listener: [`NoListener`]
/// - recover: [`NoRecover`]
pub struct Retryer<T, E> {
    policies: Policies<T, E>,
}

impl<T, E> Retryer<T, E> {
    /// Creates a `Retryer` with the default policies.
    pub fn new() -> Self {
        Self {
            policies: Policies::default(),
        }
    }

    /// Sets the retry condition, replacing any configured before.
    pub fn condition<C>(mut self, condition: C) -> Self
    where
        C: Condition<T, E> + 'static,
    {
        self.policies.condition = AnyCondition::new().or(condition);
        self
    }

    /// Adds a condition: the operation is retried if any configured
    /// condition asks for it.
    pub fn or_condition<C>(mut self, condition: C) -> Self
    where
        C: Condition<T, E> + 'static,
    {
        self.policies.condition.push(Arc::new(condition));
        self
    }

    /// Adds a wait strategy. The pause between attempts is the sum of all
    /// configured strategies.
    pub fn wait<W>(mut self, wait: W) -> Self
    where
        W: Wait<T, E> + 'static,
    {
        self.policies.wait.push(Arc::new(wait));
        self
    }

    /// Replaces all wait strategies.
    pub fn waits(mut self, waits: WaitSum<T, E>) -> Self {
        self.policies.wait = waits;
        self
    }

    /// Limits the total number of attempts, replacing the stop policy.
    ///
    /// Fails with [`ConfigError::ZeroMaxAttempts`] for zero.
    pub fn max_attempt(mut self, max_attempts: u32) -> Result<Self, ConfigError> {
        self.policies.stop = Arc::new(MaxAttempt::new(max_attempts)?);
        Ok(self)
    }

    /// Sets a custom stop policy.
    pub fn stop<S>(mut self, stop: S) -> Self
    where
        S: Stop<T, E> + 'static,
    {
        self.policies.stop = Arc::new(stop);
        self
    }

    /// Sets how the loop pauses between attempts.
    pub fn block<B>(mut self, block: B) -> Self
    where
        B: Block + 'static,
    {
        self.policies.block = Arc::new(block);
        self
    }

    /// Sets the listener notified after every attempt.
    pub fn listen<L>(mut self, listener: L) -> Self
    where
        L: Listener<T, E> + 'static,
    {
        self.policies.listener = Arc::new(listener);
        self
    }

    /// Sets the recovery policy used when retrying ends on a failure.
    pub fn recover<R>(mut self, recover: R) -> Self
    where
        R: Recover<T, E> + 'static,
    {
        self.policies.recover = Arc::new(recover);
        self
    }

    /// Runs `operation` until it is done according to the policies.
    ///
    /// - `operation`: A closure that returns a `Future` (e.g., `|| async { ... }`).
    ///
    /// Returns the value of the terminal attempt if it succeeded, otherwise
    /// whatever the [`Recover`] policy makes of its failure.
    pub async fn retry<O, F>(&self, operation: O) -> Result<T, E>
    where
        O: FnMut() -> F,
        F: Future<Output = Result<T, E>>,
    {
        let context = RetryContext::new(operation, self.policies.clone());
        engine::execute(context).await
    }
}

impl<T, E> Default for Retryer<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> Clone for Retryer<T, E> {
    fn clone(&self) -> Self {
        Self {
            policies: self.policies.clone(),
        }
    }
}

impl<T, E> fmt::Debug for Retryer<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retryer")
            .field("condition", &self.policies.condition)
            .field("wait", &self.policies.wait)
            .finish_non_exhaustive()
    }
}
