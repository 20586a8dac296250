//! Exponential backoff with full jitter.

use std::time::Duration;
use rand::Rng;

/// Upper bound of the delay after `attempt` failed attempts.
///
/// `min(base_ms * 2^(attempt - 1), max_ms)`, saturating. Attempt 0 has no delay.
pub fn backoff_ceiling(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let exponential_base = 2u64.saturating_pow(attempt - 1);
    let delay_ms = base_ms.saturating_mul(exponential_base);

    Duration::from_millis(delay_ms.min(max_ms))
}

/// Calculate exponential backoff delay, optionally with full jitter.
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64, jitter: bool) -> Duration {
    calculate_backoff_with(&mut rand::thread_rng(), attempt, base_ms, max_ms, jitter)
}

/// Same as [`calculate_backoff`], drawing jitter from the given RNG.
pub fn calculate_backoff_with<R: Rng + ?Sized>(
    rng: &mut R,
    attempt: u32,
    base_ms: u64,
    max_ms: u64,
    jitter: bool,
) -> Duration {
    let ceiling = backoff_ceiling(attempt, base_ms, max_ms);
    if !jitter {
        return ceiling;
    }

    let capped_ms = ceiling.as_millis() as u64;
    Duration::from_millis(rng.gen_range(0..=capped_ms))
}
