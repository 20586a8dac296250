//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! ResilientExecutor
//!     → AttemptReporter (injected, optional)
//!         → reporter.rs TracingReporter (structured log events)
//!         → reporter.rs MetricsReporter → metrics.rs (counters, histograms)
//!         → caller closures
//! ```
//!
//! # Design Decisions
//! - No global state in the executor; reporting is opt-in per executor
//! - Execution ID flows through every event of one call
//! - logging.rs only wires up a subscriber for binaries

pub mod logging;
pub mod metrics;
pub mod reporter;

pub use reporter::{
    AttemptEvent, AttemptEventKind, AttemptFailure, AttemptReporter, ExecutionId,
    FanoutReporter, MetricsReporter, TracingReporter,
};
