//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the executor.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::resilience::policy::{RetryPolicy, TimeoutPolicy};

/// Root configuration for a resilient executor.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Retry configuration.
    pub retry: RetryPolicy,

    /// Timeout configuration.
    pub timeout: TimeoutPolicy,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl ExecutorConfig {
    /// The policy pair handed to `execute`.
    pub fn policies(&self) -> (RetryPolicy, TimeoutPolicy) {
        (self.retry, self.timeout)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit a structured log event for every attempt.
    pub report_attempts: bool,

    /// Record attempt and outcome counters through the metrics facade.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            report_attempts: true,
            metrics_enabled: false,
        }
    }
}
