//! Retry and timeout policies.
//!
//! Both policies are plain immutable values supplied per `execute` call.
//! They deserialize straight out of the `[retry]` and `[timeout]` tables of
//! the config file.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How many times to attempt an operation and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Must be at least 1.
    pub max_attempts: u32,

    /// Delay before the second attempt, in milliseconds.
    pub base_delay_ms: u64,

    /// Upper bound for any single delay, in milliseconds.
    pub max_delay_ms: u64,

    /// Draw each delay uniformly from `[0, computed]` (full jitter).
    pub jitter: bool,
}

impl RetryPolicy {
    /// Policy that makes a single attempt and never waits.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            base_delay_ms: 0,
            max_delay_ms: 0,
            jitter: false,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_delays(mut self, base_delay_ms: u64, max_delay_ms: u64) -> Self {
        self.base_delay_ms = base_delay_ms;
        self.max_delay_ms = max_delay_ms;
        self
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 100,
            max_delay_ms: 2000,
            jitter: true,
        }
    }
}

/// Deadline applied to every individual attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutPolicy {
    /// Per-attempt deadline in milliseconds. Must be greater than zero.
    pub per_attempt_ms: u64,
}

impl TimeoutPolicy {
    pub fn from_millis(per_attempt_ms: u64) -> Self {
        Self { per_attempt_ms }
    }

    pub fn per_attempt(&self) -> Duration {
        Duration::from_millis(self.per_attempt_ms)
    }
}

impl Default for TimeoutPolicy {
    fn default() -> Self {
        Self {
            per_attempt_ms: 30_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders_override_defaults() {
        let policy = RetryPolicy::default()
            .with_max_attempts(5)
            .with_delays(10, 50)
            .with_jitter(false);

        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.base_delay_ms, 10);
        assert_eq!(policy.max_delay_ms, 50);
        assert!(!policy.jitter);
    }

    #[test]
    fn test_timeout_duration() {
        assert_eq!(
            TimeoutPolicy::from_millis(250).per_attempt(),
            Duration::from_millis(250)
        );
    }
}
