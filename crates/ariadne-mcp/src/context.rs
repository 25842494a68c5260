//! Per-call cancellation and deadline.

use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Deadline used when `now + timeout` is not representable.
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Carried through every stage of one tool call. The deadline covers the
/// whole call, so a two-hop lookup shares one budget across both round trips.
#[derive(Debug, Clone)]
pub struct CallContext {
    cancel: CancellationToken,
    deadline: Instant,
    timeout: Duration,
}

impl CallContext {
    /// A standalone context.
    pub fn new(timeout: Duration) -> Self {
        Self::with_token(CancellationToken::new(), timeout)
    }

    /// A context cancelled together with `parent` (typically the server's
    /// shutdown token).
    pub fn child_of(parent: &CancellationToken, timeout: Duration) -> Self {
        Self::with_token(parent.child_token(), timeout)
    }

    pub fn with_token(cancel: CancellationToken, timeout: Duration) -> Self {
        let now = Instant::now();
        let deadline = now
            .checked_add(timeout)
            .or_else(|| now.checked_add(FAR_FUTURE))
            .unwrap_or(now);
        Self {
            cancel,
            deadline,
            timeout,
        }
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}
