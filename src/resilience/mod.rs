//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! execute(operation, retry, timeout):
//!     → config::validation (reject bad policies, zero attempts)
//!     → timeouts.rs (race one attempt against its deadline)
//!     → On failure: executor.rs (classify, stop or continue)
//!     → backoff.rs (delay before the next attempt)
//!     → outcome.rs (single terminal Outcome)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every attempt has a deadline
//! - Attempts of one call are strictly sequential
//! - Full jitter prevents synchronized retry storms across callers

pub mod backoff;
pub mod executor;
pub mod outcome;
pub mod policy;
pub mod timeouts;

pub use executor::{execute, ResilientExecutor};
pub use outcome::{ExecutionError, FailureKind, Outcome};
pub use policy::{RetryPolicy, TimeoutPolicy};
