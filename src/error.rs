//! Directory error types with HTTP status code mapping.
//!
//! [`DirectoryError`] is the central error type for the service. Each
//! variant maps to exactly one HTTP status and Matrix `errcode`, rendered
//! as the standard Matrix error body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::IdentifierError;
use crate::ports::PolicyDenial;

/// Matrix-style JSON error body.
///
/// ```json
/// { "errcode": "M_NOT_FOUND", "error": "Room alias #foo:example.org not found" }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Stable machine-readable error code.
    pub errcode: String,
    /// Human-readable message.
    pub error: String,
}

/// Server-side error enum with HTTP status code mapping.
///
/// | Variant                   | HTTP Status                        |
/// |---------------------------|------------------------------------|
/// | `MalformedAlias`, `InvalidRequest` | 400 Bad Request           |
/// | `Unauthenticated`         | 401 Unauthorized                   |
/// | `ForbiddenDomain`, `PolicyDenied` | 403 Forbidden              |
/// | `AliasNotFound`           | 404 Not Found                      |
/// | `AliasAlreadyExists`      | 409 Conflict                       |
/// | `RemoteApplicationError`  | remote status, else 502            |
/// | everything else           | 500 Internal Server Error          |
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// The alias is not `#localpart:domain`.
    #[error("Room alias must be in the form '#localpart:domain'")]
    MalformedAlias {
        /// Alias as supplied.
        alias: String,
        /// Parse failure.
        #[source]
        source: IdentifierError,
    },

    /// Request body or parameters failed validation.
    #[error("{0}")]
    InvalidRequest(String),

    /// No valid requester identity on a request that needs one.
    #[error("{0}")]
    Unauthenticated(String),

    /// The alias belongs to another server.
    #[error("Alias must be on local homeserver")]
    ForbiddenDomain(String),

    /// The alias policy refused the operation.
    #[error("{0}")]
    PolicyDenied(#[from] PolicyDenial),

    /// Nothing (store, bridge, or remote) knows the alias.
    #[error("Room alias {0} not found")]
    AliasNotFound(String),

    /// A binding for the alias already exists.
    #[error("The alias {0} already exists.")]
    AliasAlreadyExists(String),

    /// The remote server answered the lookup with an error.
    #[error("{error}")]
    RemoteApplicationError {
        /// Server that rejected the lookup.
        destination: String,
        /// HTTP status it returned.
        status: u16,
        /// Matrix error code it returned.
        errcode: String,
        /// Message it returned.
        error: String,
    },

    /// Bridge or federation transport failure, or deadline expiry.
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Deleting an alias failed for any reason.
    #[error("alias removal failed: {0}")]
    AliasRemovalFailed(String),

    /// Alias store backend failure.
    #[error("alias store error: {0}")]
    Store(String),
}

impl DirectoryError {
    /// Returns the Matrix `errcode` for this variant.
    #[must_use]
    pub fn errcode(&self) -> &str {
        match self {
            Self::MalformedAlias { .. } | Self::InvalidRequest(_) => "M_BAD_JSON",
            Self::Unauthenticated(_) => "M_MISSING_TOKEN",
            Self::ForbiddenDomain(_) | Self::PolicyDenied(_) => "M_FORBIDDEN",
            Self::AliasNotFound(_) => "M_NOT_FOUND",
            Self::RemoteApplicationError { errcode, .. } => errcode.as_str(),
            Self::AliasAlreadyExists(_)
            | Self::UpstreamUnavailable(_)
            | Self::AliasRemovalFailed(_)
            | Self::Store(_) => "M_UNKNOWN",
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedAlias { .. } | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::ForbiddenDomain(_) | Self::PolicyDenied(_) => StatusCode::FORBIDDEN,
            Self::AliasNotFound(_) => StatusCode::NOT_FOUND,
            Self::AliasAlreadyExists(_) => StatusCode::CONFLICT,
            Self::RemoteApplicationError { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            Self::UpstreamUnavailable(_) | Self::AliasRemovalFailed(_) | Self::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show to the client. Internal failures collapse to a
    /// generic message; their detail is only logged.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::UpstreamUnavailable(_) | Self::AliasRemovalFailed(_) | Self::Store(_) => {
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for DirectoryError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            errcode: self.errcode().to_string(),
            error: self.public_message(),
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
