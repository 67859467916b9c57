//! Waiting for an asynchronous host change to take effect.

use std::time::Duration;

use tokio::sync::oneshot;

/// How a settlement wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// The host fired the change event.
    Confirmed,
    /// The timeout elapsed first.
    TimedOut,
    /// The host dropped the subscription without firing it.
    Abandoned,
}

impl Settlement {
    /// Callers proceed optimistically whatever the outcome; this only tells
    /// whether the host actually confirmed the change.
    pub fn is_confirmed(self) -> bool {
        matches!(self, Self::Confirmed)
    }
}

/// Suspends until `signal` fires or `limit` elapses, whichever comes first.
///
/// A timeout is not an error: the caller carries on either way.
// TODO: find out whether a missing change event can mean the selection
// silently failed; if so TimedOut should become a warning path.
pub async fn settle(signal: oneshot::Receiver<()>, limit: Duration) -> Settlement {
    match tokio::time::timeout(limit, signal).await {
        Ok(Ok(())) => Settlement::Confirmed,
        Ok(Err(_)) => Settlement::Abandoned,
        Err(_) => {
            tracing::debug!(timeout_ms = limit.as_millis() as u64, "settle wait timed out");
            Settlement::TimedOut
        }
    }
}
