//! Sigil-prefixed Matrix identifiers: server names, room IDs, and user IDs.
//!
//! Every identifier shares the grammar `<sigil><localpart>:<domain>`. The
//! string is split on the first `:` after the sigil, so the domain part may
//! itself contain a port (`!abc:example.org:8448`). No case-folding or other
//! normalisation is applied.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sigil for room aliases.
pub const ROOM_ALIAS_SIGIL: char = '#';
/// Sigil for room identifiers.
pub const ROOM_ID_SIGIL: char = '!';
/// Sigil for user identifiers.
pub const USER_ID_SIGIL: char = '@';

/// Reasons an identifier string can fail to parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    /// The string does not start with the expected sigil.
    #[error("identifier must start with '{expected}'")]
    MissingSigil {
        /// Sigil the identifier kind requires.
        expected: char,
    },
    /// There is no `:` separating localpart and domain.
    #[error("identifier must be in the form '{sigil}localpart:domain'")]
    MissingDomain {
        /// Sigil of the identifier kind being parsed.
        sigil: char,
    },
    /// The localpart is empty.
    #[error("identifier localpart is empty")]
    EmptyLocalpart,
    /// The domain is empty.
    #[error("identifier domain is empty")]
    EmptyDomain,
}

/// Splits `id` into `(localpart, domain)` under the given sigil.
///
/// # Errors
///
/// Returns an [`IdentifierError`] if the sigil is missing, there is no `:`,
/// or either half is empty.
pub fn split_id(sigil: char, id: &str) -> Result<(&str, &str), IdentifierError> {
    let rest = id
        .strip_prefix(sigil)
        .ok_or(IdentifierError::MissingSigil { expected: sigil })?;
    let (localpart, domain) = rest
        .split_once(':')
        .ok_or(IdentifierError::MissingDomain { sigil })?;
    if localpart.is_empty() {
        return Err(IdentifierError::EmptyLocalpart);
    }
    if domain.is_empty() {
        return Err(IdentifierError::EmptyDomain);
    }
    Ok((localpart, domain))
}

/// Name of a homeserver, e.g. `example.org` or `example.org:8448`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerName(String);

impl ServerName {
    /// Wraps a server name. Comparison is by exact string equality.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the server name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque room identifier (`!opaque:domain`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomId(String);

impl RoomId {
    /// Parses a room identifier.
    ///
    /// # Errors
    ///
    /// Returns an [`IdentifierError`] if `raw` is not `!opaque:domain`.
    pub fn parse(raw: impl Into<String>) -> Result<Self, IdentifierError> {
        let raw = raw.into();
        split_id(ROOM_ID_SIGIL, &raw)?;
        Ok(Self(raw))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RoomId {
    type Error = IdentifierError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(raw)
    }
}

impl From<RoomId> for String {
    fn from(id: RoomId) -> Self {
        id.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fully-qualified user identifier (`@localpart:domain`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Parses a user identifier.
    ///
    /// # Errors
    ///
    /// Returns an [`IdentifierError`] if `raw` is not `@localpart:domain`.
    pub fn parse(raw: impl Into<String>) -> Result<Self, IdentifierError> {
        let raw = raw.into();
        split_id(USER_ID_SIGIL, &raw)?;
        Ok(Self(raw))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = IdentifierError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(raw)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn split_id_separates_localpart_and_domain() {
        assert_eq!(split_id('#', "#foo:example.org"), Ok(("foo", "example.org")));
    }

    #[test]
    fn split_id_keeps_port_in_domain() {
        assert_eq!(
            split_id('!', "!abc:example.org:8448"),
            Ok(("abc", "example.org:8448"))
        );
    }

    #[test]
    fn split_id_rejects_missing_sigil() {
        assert_eq!(
            split_id('#', "foo:example.org"),
            Err(IdentifierError::MissingSigil { expected: '#' })
        );
    }

    #[test]
    fn split_id_rejects_wrong_sigil() {
        assert_eq!(
            split_id('#', "!foo:example.org"),
            Err(IdentifierError::MissingSigil { expected: '#' })
        );
    }

    #[test]
    fn split_id_rejects_missing_domain() {
        assert_eq!(
            split_id('#', "#foo"),
            Err(IdentifierError::MissingDomain { sigil: '#' })
        );
    }

    #[test]
    fn split_id_rejects_empty_parts() {
        assert_eq!(split_id('#', "#:example.org"), Err(IdentifierError::EmptyLocalpart));
        assert_eq!(split_id('#', "#foo:"), Err(IdentifierError::EmptyDomain));
        assert!(split_id('#', "").is_err());
    }

    #[test]
    fn room_id_deserializes_only_when_valid() {
        let ok: Result<RoomId, _> = serde_json::from_str("\"!abc:remote.org\"");
        let Ok(id) = ok else {
            panic!("valid room id rejected");
        };
        assert_eq!(id.as_str(), "!abc:remote.org");

        let bad: Result<RoomId, _> = serde_json::from_str("\"abc:remote.org\"");
        assert!(bad.is_err());
    }

    #[test]
    fn user_id_requires_at_sigil() {
        assert!(UserId::parse("@alice:example.org").is_ok());
        assert!(UserId::parse("alice:example.org").is_err());
    }

    #[test]
    fn server_name_display_is_verbatim() {
        let name = ServerName::new("Example.ORG");
        assert_eq!(name.to_string(), "Example.ORG");
        assert_ne!(name, ServerName::new("example.org"));
    }
}
