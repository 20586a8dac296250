//! Retry loop.
//!
//! # Responsibilities
//! - Validate policies before touching the operation
//! - Run attempts strictly one after another, each under the per-attempt deadline
//! - Sleep an exponentially growing, optionally jittered delay between attempts
//! - Fold everything into a single [`Outcome`]
//!
//! # Design Decisions
//! - Ordinary failures never panic and never propagate; they become `Outcome::Failure`
//! - Timeouts are always retryable; operation errors go through a caller predicate
//! - The executor holds no mutable state, so one instance serves any number of
//!   concurrent calls

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::config::schema::ExecutorConfig;
use crate::config::validation::{validate_policies, PolicyError};
use crate::observability::reporter::{
    AttemptEvent, AttemptEventKind, AttemptFailure, AttemptReporter, ExecutionId,
    FanoutReporter, MetricsReporter, TracingReporter,
};
use crate::resilience::backoff::calculate_backoff;
use crate::resilience::outcome::{ExecutionError, Outcome};
use crate::resilience::policy::{RetryPolicy, TimeoutPolicy};
use crate::resilience::timeouts::run_attempt;

/// Runs fallible async operations under a retry and timeout policy.
#[derive(Clone, Default)]
pub struct ResilientExecutor {
    reporter: Option<Arc<dyn AttemptReporter>>,
}

impl std::fmt::Debug for ResilientExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResilientExecutor")
            .field("reporter", &self.reporter.is_some())
            .finish()
    }
}

/// Per-call event sink; a no-op when no reporter is installed.
struct Emitter<'a> {
    id: ExecutionId,
    reporter: Option<&'a dyn AttemptReporter>,
}

impl Emitter<'_> {
    fn emit(&self, kind: AttemptEventKind) {
        if let Some(reporter) = self.reporter {
            reporter.report(&AttemptEvent {
                execution_id: self.id,
                kind,
            });
        }
    }
}

impl ResilientExecutor {
    /// An executor that reports nothing.
    pub fn new() -> Self {
        Self { reporter: None }
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn AttemptReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Build an executor whose reporters follow the observability settings.
    pub fn from_config(config: &ExecutorConfig) -> Self {
        let mut fanout = FanoutReporter::new();
        if config.observability.report_attempts {
            fanout = fanout.with(Arc::new(TracingReporter));
        }
        if config.observability.metrics_enabled {
            fanout = fanout.with(Arc::new(MetricsReporter));
        }

        if fanout.is_empty() {
            Self::new()
        } else {
            Self::new().with_reporter(Arc::new(fanout))
        }
    }

    /// Run `operation`, retrying every error and every timeout.
    pub async fn execute<F, Fut, T, E>(
        &self,
        operation: F,
        retry: &RetryPolicy,
        timeout: &TimeoutPolicy,
    ) -> Outcome<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.execute_if(operation, retry, timeout, |_: &E| true).await
    }

    /// Run `operation`, retrying only errors for which `retryable` returns true.
    ///
    /// A non-retryable error ends the execution at once with
    /// [`ExecutionError::Operation`]. Timeouts are always retried.
    pub async fn execute_if<F, Fut, T, E, P>(
        &self,
        mut operation: F,
        retry: &RetryPolicy,
        timeout: &TimeoutPolicy,
        retryable: P,
    ) -> Outcome<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
    {
        let emitter = Emitter {
            id: ExecutionId::new(),
            reporter: self.reporter.as_deref(),
        };

        if let Err(errors) = validate_policies(retry, timeout) {
            let error = PolicyError(errors);
            emitter.emit(AttemptEventKind::Rejected {
                reason: error.to_string(),
            });
            return Outcome::Failure {
                error: ExecutionError::Configuration(error),
                attempts: 0,
            };
        }

        let deadline = timeout.per_attempt();
        let started = Instant::now();
        let mut attempt = 0;

        loop {
            attempt += 1;
            let is_last = attempt >= retry.max_attempts;

            let (error, failure) = match run_attempt(operation(), deadline).await {
                Ok(Ok(value)) => {
                    emitter.emit(AttemptEventKind::Succeeded {
                        attempts: attempt,
                        elapsed: started.elapsed(),
                    });
                    return Outcome::Success {
                        value,
                        attempts: attempt,
                    };
                }
                Ok(Err(e)) if !retryable(&e) => {
                    emitter.emit(AttemptEventKind::AttemptFailed {
                        attempt,
                        max_attempts: retry.max_attempts,
                        failure: AttemptFailure::Operation { retryable: false },
                        elapsed: started.elapsed(),
                        next_delay: None,
                    });
                    return finish(&emitter, ExecutionError::Operation(e), attempt, started);
                }
                Ok(Err(e)) => (
                    ExecutionError::RetriesExhausted(e),
                    AttemptFailure::Operation { retryable: true },
                ),
                Err(elapsed) => (
                    ExecutionError::Timeout(elapsed.0),
                    AttemptFailure::Timeout(elapsed.0),
                ),
            };

            let next_delay = (!is_last).then(|| {
                calculate_backoff(attempt, retry.base_delay_ms, retry.max_delay_ms, retry.jitter)
            });

            emitter.emit(AttemptEventKind::AttemptFailed {
                attempt,
                max_attempts: retry.max_attempts,
                failure,
                elapsed: started.elapsed(),
                next_delay,
            });

            match next_delay {
                None => return finish(&emitter, error, attempt, started),
                Some(delay) => pause(delay).await,
            }
        }
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

fn finish<T, E>(
    emitter: &Emitter<'_>,
    error: ExecutionError<E>,
    attempts: u32,
    started: Instant,
) -> Outcome<T, E> {
    emitter.emit(AttemptEventKind::GaveUp {
        attempts,
        kind: error.kind(),
        elapsed: started.elapsed(),
    });
    Outcome::Failure { error, attempts }
}

/// Run `operation` with a default, non-reporting executor.
pub async fn execute<F, Fut, T, E>(
    operation: F,
    retry: &RetryPolicy,
    timeout: &TimeoutPolicy,
) -> Outcome<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    ResilientExecutor::new().execute(operation, retry, timeout).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resilience::outcome::FailureKind;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    fn no_jitter(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::default()
            .with_max_attempts(max_attempts)
            .with_delays(100, 1000)
            .with_jitter(false)
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_on_first_attempt() {
        let calls = AtomicU32::new(0);
        let outcome: Outcome<u32, String> = execute(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(42) }
            },
            &no_jitter(3),
            &TimeoutPolicy::from_millis(50),
        )
        .await;

        assert_eq!(outcome.value(), Some(&42));
        assert_eq!(outcome.attempts(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_failing_exhausts_retries() {
        for n in 1..=5 {
            let calls = AtomicU32::new(0);
            let outcome: Outcome<(), &str> = execute(
                || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Err("nope") }
                },
                &no_jitter(n),
                &TimeoutPolicy::from_millis(50),
            )
            .await;

            assert_eq!(outcome.attempts(), n);
            assert_eq!(outcome.failure_kind(), Some(FailureKind::RetriesExhausted));
            assert_eq!(calls.load(Ordering::SeqCst), n);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_error_stops_early() {
        let calls = AtomicU32::new(0);
        let outcome: Outcome<(), u16> = ResilientExecutor::new()
            .execute_if(
                || {
                    let n = calls.fetch_add(1, Ordering::SeqCst);
                    async move { Err(if n == 0 { 503 } else { 400 }) }
                },
                &no_jitter(5),
                &TimeoutPolicy::from_millis(50),
                |status: &u16| *status >= 500,
            )
            .await;

        assert_eq!(outcome.attempts(), 2);
        assert_eq!(outcome.failure_kind(), Some(FailureKind::Operation));
        assert_eq!(outcome.error().and_then(|e| e.operation_error()), Some(&400));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_policy_never_invokes_operation() {
        let calls = AtomicU32::new(0);
        let outcome: Outcome<(), ()> = execute(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(()) }
            },
            &no_jitter(0),
            &TimeoutPolicy::from_millis(0),
        )
        .await;

        assert_eq!(outcome.attempts(), 0);
        assert_eq!(outcome.failure_kind(), Some(FailureKind::Configuration));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        match outcome.into_result() {
            Err(ExecutionError::Configuration(policy)) => assert_eq!(policy.errors().len(), 2),
            other => panic!("expected configuration error, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_reporter_sees_every_attempt() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let executor = ResilientExecutor::new().with_reporter(Arc::new(move |e: &AttemptEvent| {
            sink.lock().unwrap().push(e.clone());
        }));

        let calls = AtomicU32::new(0);
        let outcome: Outcome<&str, &str> = executor
            .execute(
                || {
                    let n = calls.fetch_add(1, Ordering::SeqCst);
                    async move { if n < 2 { Err("flaky") } else { Ok("done") } }
                },
                &no_jitter(3),
                &TimeoutPolicy::from_millis(50),
            )
            .await;
        assert!(outcome.is_success());

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| e.execution_id == events[0].execution_id));
        assert_eq!(
            events[0].kind,
            AttemptEventKind::AttemptFailed {
                attempt: 1,
                max_attempts: 3,
                failure: AttemptFailure::Operation { retryable: true },
                elapsed: Duration::ZERO,
                next_delay: Some(Duration::from_millis(100)),
            }
        );
        assert!(matches!(
            events[2].kind,
            AttemptEventKind::Succeeded { attempts: 3, .. }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_from_config_without_reporting() {
        let mut config = ExecutorConfig::default();
        config.observability.report_attempts = false;
        config.observability.metrics_enabled = false;

        let executor = ResilientExecutor::from_config(&config);
        assert!(executor.reporter.is_none());

        config.observability.metrics_enabled = true;
        assert!(ResilientExecutor::from_config(&config).reporter.is_some());
    }
}
