//! Federation directory handler: remote servers asking about our aliases.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{FederationDirectoryQuery, RoomDirectoryResponse};
use crate::app_state::AppState;
use crate::error::{DirectoryError, ErrorResponse};

/// `GET /_matrix/federation/v1/query/directory` — Answer a remote lookup.
///
/// Only aliases on this server are answered; anything else is reported as
/// not found rather than proxied.
///
/// # Errors
///
/// Returns [`DirectoryError`] if the alias is malformed, foreign, or unknown.
#[utoipa::path(
    get,
    path = "/_matrix/federation/v1/query/directory",
    tag = "Federation",
    summary = "Federation alias query",
    description = "Resolves one of this server's aliases on behalf of a remote server.",
    params(FederationDirectoryQuery),
    responses(
        (status = 200, description = "Alias resolved", body = RoomDirectoryResponse),
        (status = 400, description = "Malformed alias", body = ErrorResponse),
        (status = 404, description = "Unknown or foreign alias", body = ErrorResponse),
    )
)]
pub async fn query_directory(
    State(state): State<AppState>,
    Query(query): Query<FederationDirectoryQuery>,
) -> Result<impl IntoResponse, DirectoryError> {
    let ctx = state.request_context();
    let entry = state
        .alias_resolver
        .resolve_for_federation(&ctx, &query.room_alias)
        .await?;
    Ok((StatusCode::OK, Json(RoomDirectoryResponse::from(entry))))
}

/// Federation routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/_matrix/federation/v1/query/directory", get(query_directory))
}
