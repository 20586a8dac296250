//! Terminal results of an `execute` call.

use std::time::Duration;

use thiserror::Error;

use crate::config::validation::PolicyError;

/// Coarse classification of a failed execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The policies were rejected before any attempt.
    Configuration,
    /// The operation failed with an error classified as non-retryable.
    Operation,
    /// The final attempt exceeded its deadline.
    Timeout,
    /// Every allowed attempt failed; the last failure was an operation error.
    RetriesExhausted,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Configuration => "configuration",
            FailureKind::Operation => "operation",
            FailureKind::Timeout => "timeout",
            FailureKind::RetriesExhausted => "retries_exhausted",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an execution failed, carrying the last underlying cause.
#[derive(Debug, Error)]
pub enum ExecutionError<E> {
    #[error("invalid execution policy: {0}")]
    Configuration(PolicyError),

    #[error("operation failed: {0}")]
    Operation(E),

    #[error("attempt timed out after {0:?}")]
    Timeout(Duration),

    #[error("retries exhausted: {0}")]
    RetriesExhausted(E),
}

impl<E> ExecutionError<E> {
    pub fn kind(&self) -> FailureKind {
        match self {
            ExecutionError::Configuration(_) => FailureKind::Configuration,
            ExecutionError::Operation(_) => FailureKind::Operation,
            ExecutionError::Timeout(_) => FailureKind::Timeout,
            ExecutionError::RetriesExhausted(_) => FailureKind::RetriesExhausted,
        }
    }

    /// The operation's own error, if the last attempt produced one.
    pub fn operation_error(&self) -> Option<&E> {
        match self {
            ExecutionError::Operation(e) | ExecutionError::RetriesExhausted(e) => Some(e),
            _ => None,
        }
    }

    pub fn into_operation_error(self) -> Option<E> {
        match self {
            ExecutionError::Operation(e) | ExecutionError::RetriesExhausted(e) => Some(e),
            _ => None,
        }
    }
}

/// Result of one `execute` call. Created once, never mutated afterwards.
#[derive(Debug)]
pub enum Outcome<T, E> {
    Success {
        value: T,
        /// 1-based number of the attempt that succeeded.
        attempts: u32,
    },
    Failure {
        error: ExecutionError<E>,
        /// Completed attempts, including the failing final one. Zero for
        /// configuration failures.
        attempts: u32,
    },
}

impl<T, E> Outcome<T, E> {
    pub fn attempts(&self) -> u32 {
        match self {
            Outcome::Success { attempts, .. } | Outcome::Failure { attempts, .. } => *attempts,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    /// Failure classification, `None` on success.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Outcome::Success { .. } => None,
            Outcome::Failure { error, .. } => Some(error.kind()),
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Success { value, .. } => Some(value),
            Outcome::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&ExecutionError<E>> {
        match self {
            Outcome::Success { .. } => None,
            Outcome::Failure { error, .. } => Some(error),
        }
    }

    /// Drop the attempt count and convert into a plain `Result`.
    pub fn into_result(self) -> Result<T, ExecutionError<E>> {
        match self {
            Outcome::Success { value, .. } => Ok(value),
            Outcome::Failure { error, .. } => Err(error),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U, E> {
        match self {
            Outcome::Success { value, attempts } => Outcome::Success {
                value: f(value),
                attempts,
            },
            Outcome::Failure { error, attempts } => Outcome::Failure { error, attempts },
        }
    }
}
