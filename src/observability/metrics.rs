//! Metrics collection.
//!
//! # Metrics
//! - `executor_attempts_total` (counter): attempts by result (success, error, timeout)
//! - `executor_outcomes_total` (counter): executions by terminal kind
//! - `executor_backoff_seconds` (histogram): delays slept between attempts
//! - `executor_execution_duration_seconds` (histogram): wall time per execution
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; installing an exporter is
//!   the host application's job
//! - Without an installed recorder every call is a no-op

use std::time::Duration;

use metrics::{counter, histogram};

pub fn record_attempt(result: &'static str) {
    counter!("executor_attempts_total", "result" => result).increment(1);
}

pub fn record_outcome(kind: &'static str) {
    counter!("executor_outcomes_total", "kind" => kind).increment(1);
}

pub fn record_backoff(delay: Duration) {
    histogram!("executor_backoff_seconds").record(delay.as_secs_f64());
}

pub fn record_execution_duration(elapsed: Duration) {
    histogram!("executor_execution_duration_seconds").record(elapsed.as_secs_f64());
}
