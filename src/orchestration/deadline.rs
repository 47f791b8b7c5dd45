//! Deadline contexts shared by the calls of one fan-out.
//!
//! # Responsibilities
//! - Create a cancellation context that fires after a fixed duration
//! - Allow early manual cancellation
//! - Tear the context down deterministically when the owner exits
//!
//! # Design Decisions
//! - One `CancellationToken` per context; no global timer state
//! - The timer is a task owned by the guard and aborted on drop
//! - Dropping the guard cancels the context (covers every exit path)

use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Errors raised while creating a deadline context.
#[derive(Debug, Error)]
pub enum DeadlineError {
    #[error("deadline duration must be greater than zero")]
    ZeroDuration,

    #[error("no async runtime available to drive the deadline timer")]
    NoRuntime,
}

/// Read-only handle observed by every in-flight call.
#[derive(Debug, Clone)]
pub struct DeadlineContext {
    token: CancellationToken,
    expires_at: Instant,
}

/// Owner side of a [`DeadlineContext`].
///
/// Cancels the context when dropped.
#[derive(Debug)]
pub struct DeadlineGuard {
    token: CancellationToken,
    timer: JoinHandle<()>,
}

impl DeadlineContext {
    /// Create a context that cancels itself after `duration`.
    pub fn new(duration: Duration) -> Result<(Self, DeadlineGuard), DeadlineError> {
        if duration.is_zero() {
            return Err(DeadlineError::ZeroDuration);
        }
        let handle = tokio::runtime::Handle::try_current().map_err(|_| DeadlineError::NoRuntime)?;

        let token = CancellationToken::new();
        let expires_at = Instant::now() + duration;

        let timer_token = token.clone();
        let timer = handle.spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep_until(expires_at) => {
                    tracing::debug!(deadline_ms = duration.as_millis() as u64, "Deadline elapsed, cancelling calls");
                    timer_token.cancel();
                }
                _ = timer_token.cancelled() => {}
            }
        });

        Ok((
            Self {
                token: token.clone(),
                expires_at,
            },
            DeadlineGuard { token, timer },
        ))
    }

    /// Resolves once the deadline elapses or the guard cancels.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    /// Time left before expiry (zero once expired).
    pub fn remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}

impl DeadlineGuard {
    /// Cancel every call sharing this context now.
    pub fn cancel(&self) {
        self.token.cancel();
    }
}

impl Drop for DeadlineGuard {
    fn drop(&mut self) {
        self.token.cancel();
        self.timer.abort();
    }
}
