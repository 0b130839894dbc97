//! Per-request deadline carried into upstream calls.

use std::time::Duration;

use tokio::time::Instant;

/// Deadline for one top-level operation.
///
/// Bridge and federation calls are raced against it; when it passes the
/// in-flight call is dropped and the operation fails as upstream-unavailable.
/// No upstream call is started once it has passed.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext {
    deadline: Instant,
}

impl RequestContext {
    /// Context whose deadline is `timeout` from now.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Instant::now() + timeout,
        }
    }

    /// Returns the deadline.
    #[must_use]
    pub const fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Returns `true` once the deadline has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline
    }
}
