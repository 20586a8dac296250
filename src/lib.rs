//! Resilient operation executor.
//!
//! Runs a fallible async operation under a per-attempt timeout and a bounded
//! retry policy (exponential backoff, optional full jitter) and returns a
//! typed [`Outcome`] instead of panicking or propagating the error.

pub mod config;
pub mod observability;
pub mod resilience;

pub use config::ExecutorConfig;
pub use observability::{AttemptEvent, AttemptReporter, ExecutionId, TracingReporter};
pub use resilience::{
    execute, ExecutionError, FailureKind, Outcome, ResilientExecutor, RetryPolicy, TimeoutPolicy,
};
