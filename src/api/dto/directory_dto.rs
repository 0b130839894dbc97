//! Room directory request and response bodies.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::RoomDirectoryEntry;

/// Where an alias points.
///
/// ```json
/// { "room_id": "!abc:example.org", "servers": ["example.org"] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RoomDirectoryResponse {
    /// Room the alias is bound to.
    pub room_id: String,
    /// Servers that can be used to join the room.
    pub servers: Vec<String>,
}

impl From<RoomDirectoryEntry> for RoomDirectoryResponse {
    fn from(entry: RoomDirectoryEntry) -> Self {
        Self {
            room_id: entry.room_id.into(),
            servers: entry.servers.into_iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Body of `PUT /_matrix/client/r0/directory/room/{roomAlias}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SetAliasRequest {
    /// Room to bind the alias to.
    pub room_id: String,
}

/// The empty JSON object returned by mutations.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct EmptyResponse {}

/// Query string of the federation directory endpoint.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FederationDirectoryQuery {
    /// Alias to look up, e.g. `#foo:example.org`.
    pub room_alias: String,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{RoomId, ServerName};

    #[test]
    fn response_flattens_identifiers_to_strings() {
        let Ok(room_id) = RoomId::parse("!abc:example.org") else {
            panic!("valid room id");
        };
        let entry = RoomDirectoryEntry {
            room_id,
            servers: vec![ServerName::new("example.org"), ServerName::new("other.org")],
        };
        let json = serde_json::to_value(RoomDirectoryResponse::from(entry)).ok();
        assert_eq!(
            json,
            Some(serde_json::json!({
                "room_id": "!abc:example.org",
                "servers": ["example.org", "other.org"],
            }))
        );
    }

    #[test]
    fn empty_response_is_an_empty_object() {
        let json = serde_json::to_string(&EmptyResponse::default()).ok();
        assert_eq!(json.as_deref(), Some("{}"));
    }
}
