//! Type-safe room alias.
//!
//! [`RoomAlias`] is a validated `#localpart:domain` string. Parsing happens
//! once at the edge; everything behind it (stores, bridge, federation) only
//! ever sees well-formed aliases.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::identifiers::{IdentifierError, ROOM_ALIAS_SIGIL, ServerName, split_id};

/// Human-readable room alias, e.g. `#room:example.org`.
///
/// Keeps the original string alongside the byte offset of the domain so
/// that [`RoomAlias::localpart`] and [`RoomAlias::server_name`] are free.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomAlias {
    raw: String,
    domain_start: usize,
}

impl RoomAlias {
    /// Parses an untrusted alias string.
    ///
    /// # Errors
    ///
    /// Returns an [`IdentifierError`] if `raw` is not `#localpart:domain`.
    pub fn parse(raw: impl Into<String>) -> Result<Self, IdentifierError> {
        let raw = raw.into();
        let (localpart, _) = split_id(ROOM_ALIAS_SIGIL, &raw)?;
        let domain_start = ROOM_ALIAS_SIGIL.len_utf8() + localpart.len() + 1;
        Ok(Self { raw, domain_start })
    }

    /// Returns the full alias as supplied.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the part between the sigil and the first `:`.
    #[must_use]
    pub fn localpart(&self) -> &str {
        self.raw
            .get(ROOM_ALIAS_SIGIL.len_utf8()..self.domain_start - 1)
            .unwrap_or_default()
    }

    /// Returns the domain suffix.
    #[must_use]
    pub fn domain(&self) -> &str {
        self.raw.get(self.domain_start..).unwrap_or_default()
    }

    /// Returns the domain as a [`ServerName`].
    #[must_use]
    pub fn server_name(&self) -> ServerName {
        ServerName::new(self.domain())
    }

    /// Returns `true` if the alias belongs to `server_name` (exact match).
    #[must_use]
    pub fn is_local_to(&self, server_name: &ServerName) -> bool {
        self.domain() == server_name.as_str()
    }
}

impl fmt::Display for RoomAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl TryFrom<String> for RoomAlias {
    type Error = IdentifierError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(raw)
    }
}

impl From<RoomAlias> for String {
    fn from(alias: RoomAlias) -> Self {
        alias.raw
    }
}
