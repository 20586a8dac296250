//! Timeout enforcement.
//!
//! # Responsibilities
//! - Race a single attempt against its deadline
//! - Abandon the attempt when the deadline passes
//!
//! # Design Decisions
//! - Uses Tokio's timer; the wait suspends, never spins
//! - The timer is polled first, so a result produced at the exact deadline
//!   counts as a timeout
//! - On timeout the attempt future is dropped. Anything it spawned
//!   elsewhere keeps running; cancellation beyond that belongs to the operation

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

/// The attempt did not settle before its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("attempt timed out after {0:?}")]
pub struct Elapsed(pub Duration);

/// Run `attempt` with a hard deadline.
pub async fn run_attempt<F, T>(attempt: F, deadline: Duration) -> Result<T, Elapsed>
where
    F: Future<Output = T>,
{
    let timer = tokio::time::sleep(deadline);
    tokio::pin!(timer);
    tokio::pin!(attempt);

    tokio::select! {
        biased;
        _ = &mut timer => Err(Elapsed(deadline)),
        output = &mut attempt => Ok(output),
    }
}
