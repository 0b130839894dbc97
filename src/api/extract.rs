//! Request extractors.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::domain::UserId;
use crate::error::DirectoryError;

/// Header the authenticating proxy sets to the requesting user's id.
pub const REQUESTER_HEADER: &str = "x-matrix-user-id";

/// The authenticated user making the request.
///
/// Read from [`REQUESTER_HEADER`]; a missing or malformed header rejects the
/// request with [`DirectoryError::Unauthenticated`].
#[derive(Debug, Clone)]
pub struct Requester(pub UserId);

impl<S> FromRequestParts<S> for Requester
where
    S: Send + Sync,
{
    type Rejection = DirectoryError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(REQUESTER_HEADER)
            .ok_or_else(|| DirectoryError::Unauthenticated("Missing requester identity".to_string()))?;
        let raw = value
            .to_str()
            .map_err(|_| DirectoryError::Unauthenticated("Invalid requester identity".to_string()))?;
        let user_id = UserId::parse(raw)
            .map_err(|_| DirectoryError::Unauthenticated("Invalid requester identity".to_string()))?;
        Ok(Self(user_id))
    }
}
