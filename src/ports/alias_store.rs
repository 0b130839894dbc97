//! Port for the local alias → room binding store.

use async_trait::async_trait;

use crate::domain::{RoomAlias, RoomId, UserId};

/// Errors raised by alias store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AliasStoreError {
    /// A binding for the alias already exists.
    #[error("alias {0} already exists")]
    AlreadyExists(RoomAlias),
    /// No binding for the alias is owned by the requester (or none exists).
    #[error("no binding for alias {0} is owned by the requester")]
    NotFound(RoomAlias),
    /// Connection, query, or mutation failure in the backend.
    #[error("alias store backend failure: {message}")]
    Backend {
        /// Backend-specific detail, for logs only.
        message: String,
    },
}

/// Key-value store of local alias bindings, keyed by alias.
///
/// Implementations must make `create` an atomic create-if-absent per alias
/// (exactly one of several concurrent creates wins) and give read-after-write
/// consistency for `lookup`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AliasStore: Send + Sync {
    /// Returns the room bound to `alias`, if any.
    async fn lookup(&self, alias: &RoomAlias) -> Result<Option<RoomId>, AliasStoreError>;

    /// Binds `alias` to `room_id` under `owner`.
    async fn create(
        &self,
        alias: &RoomAlias,
        room_id: &RoomId,
        owner: &UserId,
    ) -> Result<(), AliasStoreError>;

    /// Removes the binding for `alias` on behalf of `owner`.
    async fn delete(&self, alias: &RoomAlias, owner: &UserId) -> Result<(), AliasStoreError>;
}
