//! Policy validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (attempts >= 1, deadline > 0, max delay >= base)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function over the two policies
//! - Runs before a config is accepted and before every execution

use thiserror::Error;

use crate::config::schema::ExecutorConfig;
use crate::resilience::policy::{RetryPolicy, TimeoutPolicy};

/// A single rejected policy field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("retry.max_attempts must be at least 1")]
    ZeroAttempts,

    #[error("timeout.per_attempt_ms must be greater than 0")]
    ZeroTimeout,

    #[error("retry.max_delay_ms ({max_delay_ms}) is below retry.base_delay_ms ({base_delay_ms})")]
    DelayBoundsInverted {
        base_delay_ms: u64,
        max_delay_ms: u64,
    },
}

/// Every violation found in a pair of policies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", join(.0))]
pub struct PolicyError(pub Vec<ValidationError>);

impl PolicyError {
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Check a retry/timeout policy pair.
pub fn validate_policies(
    retry: &RetryPolicy,
    timeout: &TimeoutPolicy,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if retry.max_attempts == 0 {
        errors.push(ValidationError::ZeroAttempts);
    }

    if retry.max_delay_ms < retry.base_delay_ms {
        errors.push(ValidationError::DelayBoundsInverted {
            base_delay_ms: retry.base_delay_ms,
            max_delay_ms: retry.max_delay_ms,
        });
    }

    if timeout.per_attempt_ms == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub fn validate_config(config: &ExecutorConfig) -> Result<(), Vec<ValidationError>> {
    validate_policies(&config.retry, &config.timeout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_config(&ExecutorConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let retry = RetryPolicy {
            max_attempts: 0,
            base_delay_ms: 500,
            max_delay_ms: 100,
            jitter: false,
        };
        let timeout = TimeoutPolicy::from_millis(0);

        let errors = validate_policies(&retry, &timeout).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::ZeroAttempts,
                ValidationError::DelayBoundsInverted {
                    base_delay_ms: 500,
                    max_delay_ms: 100,
                },
                ValidationError::ZeroTimeout,
            ]
        );
    }

    #[test]
    fn test_equal_delay_bounds_allowed() {
        let retry = RetryPolicy::default().with_delays(250, 250);
        assert!(validate_policies(&retry, &TimeoutPolicy::default()).is_ok());
    }

    #[test]
    fn test_policy_error_message() {
        let err = PolicyError(vec![ValidationError::ZeroAttempts, ValidationError::ZeroTimeout]);
        assert_eq!(
            err.to_string(),
            "retry.max_attempts must be at least 1, timeout.per_attempt_ms must be greater than 0"
        );
    }
}
