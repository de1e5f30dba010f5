// Author: Jacques Murray

//! Errors raised while configuring a [`Retryer`](crate::Retryer).
//!
//! Failures of the retried operation are never wrapped: they reach the
//! caller as the operation's own error type.

use thiserror::Error;

/// An invalid policy setup, rejected when it is configured rather than
/// when the operation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// At least one attempt must always be allowed.
    #[error("max attempts must be at least 1 (got 0)")]
    ZeroMaxAttempts,
}
