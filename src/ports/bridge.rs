//! Port for bridges (application services) that own alias namespaces.

use async_trait::async_trait;

use crate::domain::RoomAlias;

/// Failure talking to a bridge. Always a hard error for the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("bridge query for {alias} failed: {message}")]
pub struct BridgeError {
    /// Alias being queried.
    pub alias: String,
    /// Transport or protocol detail, for logs only.
    pub message: String,
}

impl BridgeError {
    /// Creates a bridge error for `alias`.
    #[must_use]
    pub fn new(alias: &RoomAlias, message: impl Into<String>) -> Self {
        Self {
            alias: alias.to_string(),
            message: message.into(),
        }
    }
}

/// Asks bridges whether an alias exists outside the local store.
///
/// This is a read-shaped call with side effects: a bridge that answers
/// `true` may have just created the room and registered the alias binding
/// in the local store. Callers must not assume idempotence, must not call
/// it speculatively, and must call it at most once per resolution.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BridgeQueryService: Send + Sync {
    /// Returns `true` if some bridge claims (and possibly just created) `alias`.
    async fn alias_exists(&self, alias: &RoomAlias) -> Result<bool, BridgeError>;
}

/// Bridge service for deployments without application services.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoBridge;

#[async_trait]
impl BridgeQueryService for NoBridge {
    async fn alias_exists(&self, _alias: &RoomAlias) -> Result<bool, BridgeError> {
        Ok(false)
    }
}
