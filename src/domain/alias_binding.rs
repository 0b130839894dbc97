//! Local alias → room binding as held by an alias store.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{RoomAlias, RoomId, UserId};

/// Association of a local alias with a room and the user who created it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasBinding {
    /// The bound alias (always local to this server).
    pub alias: RoomAlias,
    /// Target room.
    pub room_id: RoomId,
    /// User that created the binding.
    pub owner: UserId,
    /// Creation timestamp (immutable).
    pub created_at: DateTime<Utc>,
}

impl AliasBinding {
    /// Creates a binding stamped with the current time.
    #[must_use]
    pub fn new(alias: RoomAlias, room_id: RoomId, owner: UserId) -> Self {
        Self {
            alias,
            room_id,
            owner,
            created_at: Utc::now(),
        }
    }

    /// Returns `true` if `user` created this binding.
    #[must_use]
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        self.owner == *user
    }
}
