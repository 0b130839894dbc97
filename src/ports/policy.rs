//! Authorization hook for alias mutations.

use async_trait::async_trait;

use crate::domain::{RoomAlias, RoomId, UserId};

/// A policy refused the operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct PolicyDenial {
    /// Reason shown to the requester.
    pub reason: String,
}

impl PolicyDenial {
    /// Creates a denial with the given reason.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Decides whether a user may bind or unbind an alias.
///
/// Typical implementations check the user's power level in the target room.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AliasPolicy: Send + Sync {
    /// Checks that `owner` may bind `alias` to `room_id`.
    async fn authorize_create(
        &self,
        owner: &UserId,
        alias: &RoomAlias,
        room_id: &RoomId,
    ) -> Result<(), PolicyDenial>;

    /// Checks that `owner` may remove `alias`.
    async fn authorize_delete(&self, owner: &UserId, alias: &RoomAlias)
    -> Result<(), PolicyDenial>;
}

/// Policy that permits every operation.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAllPolicy;

#[async_trait]
impl AliasPolicy for AllowAllPolicy {
    async fn authorize_create(
        &self,
        _owner: &UserId,
        _alias: &RoomAlias,
        _room_id: &RoomId,
    ) -> Result<(), PolicyDenial> {
        Ok(())
    }

    async fn authorize_delete(
        &self,
        _owner: &UserId,
        _alias: &RoomAlias,
    ) -> Result<(), PolicyDenial> {
        Ok(())
    }
}
