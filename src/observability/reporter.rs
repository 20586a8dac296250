//! Attempt reporting.
//!
//! The executor never logs on its own. Callers that want visibility inject an
//! [`AttemptReporter`]; the executor hands it one [`AttemptEvent`] per failed
//! attempt and one for the terminal result.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::observability::metrics;
use crate::resilience::outcome::FailureKind;

/// Correlates every event of one `execute` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExecutionId(Uuid);

impl ExecutionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ExecutionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// How a single attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptFailure {
    /// The operation returned an error.
    Operation { retryable: bool },
    /// The attempt hit its deadline.
    Timeout(Duration),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptEventKind {
    /// The policies were rejected; nothing was attempted.
    Rejected { reason: String },

    /// One attempt failed. `next_delay` is `None` when no attempt follows.
    AttemptFailed {
        attempt: u32,
        max_attempts: u32,
        failure: AttemptFailure,
        elapsed: Duration,
        next_delay: Option<Duration>,
    },

    Succeeded { attempts: u32, elapsed: Duration },

    /// The execution ended in failure after `attempts` tries.
    GaveUp {
        attempts: u32,
        kind: FailureKind,
        elapsed: Duration,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptEvent {
    pub execution_id: ExecutionId,
    pub kind: AttemptEventKind,
}

/// Observer of executor progress.
pub trait AttemptReporter: Send + Sync {
    fn report(&self, event: &AttemptEvent);
}

impl<F> AttemptReporter for F
where
    F: Fn(&AttemptEvent) + Send + Sync,
{
    fn report(&self, event: &AttemptEvent) {
        self(event)
    }
}

/// Emits each event as a structured `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl AttemptReporter for TracingReporter {
    fn report(&self, event: &AttemptEvent) {
        let execution_id = event.execution_id;
        match &event.kind {
            AttemptEventKind::Rejected { reason } => {
                tracing::error!(
                    execution_id = %execution_id,
                    reason = %reason,
                    "Execution rejected"
                );
            }
            AttemptEventKind::AttemptFailed {
                attempt,
                max_attempts,
                failure,
                elapsed,
                next_delay,
            } => match next_delay {
                Some(delay) => tracing::warn!(
                    execution_id = %execution_id,
                    attempt = *attempt,
                    max_attempts = *max_attempts,
                    failure = ?failure,
                    elapsed = ?elapsed,
                    delay = ?delay,
                    "Attempt failed, retrying"
                ),
                None => tracing::warn!(
                    execution_id = %execution_id,
                    attempt = *attempt,
                    max_attempts = *max_attempts,
                    failure = ?failure,
                    elapsed = ?elapsed,
                    "Attempt failed"
                ),
            },
            AttemptEventKind::Succeeded { attempts, elapsed } => {
                tracing::info!(
                    execution_id = %execution_id,
                    attempts = *attempts,
                    elapsed = ?elapsed,
                    "Execution succeeded"
                );
            }
            AttemptEventKind::GaveUp { attempts, kind, elapsed } => {
                tracing::error!(
                    execution_id = %execution_id,
                    attempts = *attempts,
                    kind = %kind,
                    elapsed = ?elapsed,
                    "Execution failed"
                );
            }
        }
    }
}

/// Records counters and histograms through the metrics facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsReporter;

impl AttemptReporter for MetricsReporter {
    fn report(&self, event: &AttemptEvent) {
        match &event.kind {
            AttemptEventKind::Rejected { .. } => {
                metrics::record_outcome(FailureKind::Configuration.as_str());
            }
            AttemptEventKind::AttemptFailed { failure, next_delay, .. } => {
                let result = match failure {
                    AttemptFailure::Operation { .. } => "error",
                    AttemptFailure::Timeout(_) => "timeout",
                };
                metrics::record_attempt(result);
                if let Some(delay) = next_delay {
                    metrics::record_backoff(*delay);
                }
            }
            AttemptEventKind::Succeeded { elapsed, .. } => {
                metrics::record_attempt("success");
                metrics::record_outcome("success");
                metrics::record_execution_duration(*elapsed);
            }
            AttemptEventKind::GaveUp { kind, elapsed, .. } => {
                metrics::record_outcome(kind.as_str());
                metrics::record_execution_duration(*elapsed);
            }
        }
    }
}

/// Forwards every event to each inner reporter in order.
#[derive(Clone, Default)]
pub struct FanoutReporter {
    reporters: Vec<Arc<dyn AttemptReporter>>,
}

impl FanoutReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, reporter: Arc<dyn AttemptReporter>) -> Self {
        self.reporters.push(reporter);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.reporters.is_empty()
    }
}

impl AttemptReporter for FanoutReporter {
    fn report(&self, event: &AttemptEvent) {
        for reporter in &self.reporters {
            reporter.report(event);
        }
    }
}
