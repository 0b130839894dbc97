//! Result of resolving a room alias.

use serde::{Deserialize, Serialize};

use super::identifiers::{RoomId, ServerName};

/// Room identifier plus the servers a client may join through.
///
/// Built fresh for every resolution and handed to the caller; never cached.
/// Local hits carry an empty server list; remote hits carry whatever the
/// remote server returned, in its order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDirectoryEntry {
    /// Resolved room.
    pub room_id: RoomId,
    /// Candidate servers for joining via this alias.
    pub servers: Vec<ServerName>,
}

impl RoomDirectoryEntry {
    /// Entry for a locally bound alias (no join servers).
    #[must_use]
    pub fn local(room_id: RoomId) -> Self {
        Self {
            room_id,
            servers: Vec::new(),
        }
    }
}
