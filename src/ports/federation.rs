//! Port for server-to-server alias lookups.

use async_trait::async_trait;

use crate::domain::{RoomAlias, RoomId, ServerName};

/// A remote server answered, but with an error status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRejection {
    /// HTTP status returned by the remote.
    pub status: u16,
    /// Matrix error code from the remote body (`M_UNKNOWN` if absent).
    pub errcode: String,
    /// Human-readable message from the remote body.
    pub error: String,
}

/// Failed federation lookup.
///
/// `remote` is set only when the remote server responded and signalled
/// failure; every other failure (connect, timeout, undecodable body) leaves
/// it `None`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("federation lookup against {destination} failed: {message}")]
pub struct FederationError {
    /// Server that was queried.
    pub destination: ServerName,
    /// Detail for logs.
    pub message: String,
    /// Structured remote rejection, if the remote answered.
    pub remote: Option<RemoteRejection>,
}

impl FederationError {
    /// Transport-level failure: the remote gave no usable answer.
    #[must_use]
    pub fn transport(destination: &ServerName, message: impl Into<String>) -> Self {
        Self {
            destination: destination.clone(),
            message: message.into(),
            remote: None,
        }
    }

    /// The remote responded with an application error.
    #[must_use]
    pub fn rejected(destination: &ServerName, rejection: RemoteRejection) -> Self {
        Self {
            destination: destination.clone(),
            message: format!(
                "remote returned {} {}: {}",
                rejection.status, rejection.errcode, rejection.error
            ),
            remote: Some(rejection),
        }
    }

    /// Returns the remote's rejection, if it answered with one.
    #[must_use]
    pub fn remote_rejection(&self) -> Option<&RemoteRejection> {
        self.remote.as_ref()
    }
}

/// Successful answer to a directory query. `room_id` is `None` when the
/// remote answered with an empty room identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FederationDirectoryResponse {
    /// Room the alias points at, if any.
    pub room_id: Option<RoomId>,
    /// Servers the remote suggests joining through.
    pub servers: Vec<ServerName>,
}

/// Outbound federation client.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FederationClient: Send + Sync {
    /// Asks `destination` which room `alias` points at. One request, no retries.
    async fn lookup_alias(
        &self,
        destination: &ServerName,
        alias: &RoomAlias,
    ) -> Result<FederationDirectoryResponse, FederationError>;
}
