//! Client-server room directory handlers: resolve, create, delete.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{EmptyResponse, RoomDirectoryResponse, SetAliasRequest};
use crate::api::extract::Requester;
use crate::app_state::AppState;
use crate::domain::RoomId;
use crate::error::{DirectoryError, ErrorResponse};

/// `GET /_matrix/client/r0/directory/room/{roomAlias}` — Resolve an alias.
///
/// # Errors
///
/// Returns [`DirectoryError`] if the alias is malformed, unknown, or a
/// remote server or bridge fails.
#[utoipa::path(
    get,
    path = "/_matrix/client/r0/directory/room/{roomAlias}",
    tag = "Directory",
    summary = "Resolve a room alias",
    description = "Looks the alias up locally (falling back to application services) or asks the alias's home server.",
    params(("roomAlias" = String, Path, description = "Room alias, e.g. `#foo:example.org`")),
    responses(
        (status = 200, description = "Alias resolved", body = RoomDirectoryResponse),
        (status = 400, description = "Malformed alias", body = ErrorResponse),
        (status = 404, description = "Unknown alias", body = ErrorResponse),
    )
)]
pub async fn get_room_alias(
    State(state): State<AppState>,
    Path(room_alias): Path<String>,
) -> Result<impl IntoResponse, DirectoryError> {
    let ctx = state.request_context();
    let entry = state.alias_resolver.resolve_alias(&ctx, &room_alias).await?;
    Ok((StatusCode::OK, Json(RoomDirectoryResponse::from(entry))))
}

/// `PUT /_matrix/client/r0/directory/room/{roomAlias}` — Create a local alias.
///
/// # Errors
///
/// Returns [`DirectoryError`] on a malformed body or alias, a foreign
/// domain, a policy refusal, or an existing binding.
#[utoipa::path(
    put,
    path = "/_matrix/client/r0/directory/room/{roomAlias}",
    tag = "Directory",
    summary = "Create a room alias",
    description = "Binds a local alias to a room. Requires the `X-Matrix-User-Id` header.",
    params(("roomAlias" = String, Path, description = "Local room alias")),
    request_body = SetAliasRequest,
    responses(
        (status = 200, description = "Alias created", body = EmptyResponse),
        (status = 400, description = "Malformed alias or body", body = ErrorResponse),
        (status = 401, description = "No requester identity", body = ErrorResponse),
        (status = 403, description = "Alias not on this server or not permitted", body = ErrorResponse),
        (status = 409, description = "Alias already exists", body = ErrorResponse),
    )
)]
pub async fn put_room_alias(
    State(state): State<AppState>,
    Path(room_alias): Path<String>,
    Requester(owner): Requester,
    body: Result<Json<SetAliasRequest>, JsonRejection>,
) -> Result<impl IntoResponse, DirectoryError> {
    let alias = state.alias_resolver.local_alias(&room_alias)?;

    let Json(req) = body.map_err(|e| DirectoryError::InvalidRequest(e.body_text()))?;
    let room_id = RoomId::parse(req.room_id)
        .map_err(|e| DirectoryError::InvalidRequest(format!("Invalid room_id: {e}")))?;

    state
        .alias_resolver
        .create_local_alias(alias.as_str(), &room_id, &owner)
        .await?;

    Ok((StatusCode::OK, Json(EmptyResponse::default())))
}

/// `DELETE /_matrix/client/r0/directory/room/{roomAlias}` — Remove a local alias.
///
/// # Errors
///
/// Returns [`DirectoryError`] if the policy refuses or removal fails.
#[utoipa::path(
    delete,
    path = "/_matrix/client/r0/directory/room/{roomAlias}",
    tag = "Directory",
    summary = "Delete a room alias",
    description = "Removes an alias created by the requester. Requires the `X-Matrix-User-Id` header.",
    params(("roomAlias" = String, Path, description = "Local room alias")),
    responses(
        (status = 200, description = "Alias removed", body = EmptyResponse),
        (status = 401, description = "No requester identity", body = ErrorResponse),
        (status = 403, description = "Not permitted", body = ErrorResponse),
        (status = 500, description = "Removal failed", body = ErrorResponse),
    )
)]
pub async fn delete_room_alias(
    State(state): State<AppState>,
    Path(room_alias): Path<String>,
    Requester(owner): Requester,
) -> Result<impl IntoResponse, DirectoryError> {
    state
        .alias_resolver
        .delete_local_alias(&room_alias, &owner)
        .await?;
    Ok((StatusCode::OK, Json(EmptyResponse::default())))
}

/// Client-server directory routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/_matrix/client/r0/directory/room/{roomAlias}",
        get(get_room_alias)
            .put(put_room_alias)
            .delete(delete_room_alias),
    )
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Method, Request};
    use tower::ServiceExt;

    use super::*;
    use crate::api::extract::REQUESTER_HEADER;
    use crate::domain::ServerName;
    use crate::persistence::InMemoryAliasStore;
    use crate::ports::{
        FederationDirectoryResponse, FederationError, MockFederationClient, NoBridge,
        RemoteRejection,
    };
    use crate::service::AliasResolver;

    const ALIAS_PATH: &str = "/_matrix/client/r0/directory/room/%23foo:example.org";

    fn app(federation: MockFederationClient) -> Router {
        let resolver = AliasResolver::new(
            ServerName::new("example.org"),
            Arc::new(InMemoryAliasStore::new()),
            Arc::new(NoBridge),
            Arc::new(federation),
        );
        routes().with_state(AppState::new(Arc::new(resolver), Duration::from_secs(5)))
    }

    fn request(method: Method, uri: &str, user: Option<&str>, body: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header(REQUESTER_HEADER, user);
        }
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let Ok(request) = builder.body(body) else {
            panic!("request build failed");
        };
        request
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let Ok(response) = app.clone().oneshot(request).await else {
            panic!("router failed");
        };
        let status = response.status();
        let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
            panic!("body read failed");
        };
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    fn put_foo(user: &str) -> Request<Body> {
        request(
            Method::PUT,
            ALIAS_PATH,
            Some(user),
            Some(r#"{"room_id":"!abc:example.org"}"#),
        )
    }

    #[tokio::test]
    async fn create_then_resolve_then_delete() {
        let app = app(MockFederationClient::new());

        let (status, body) = send(&app, put_foo("@alice:example.org")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({}));

        let (status, body) = send(&app, request(Method::GET, ALIAS_PATH, None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!({ "room_id": "!abc:example.org", "servers": [] })
        );

        let (status, _) = send(
            &app,
            request(Method::DELETE, ALIAS_PATH, Some("@alice:example.org"), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, request(Method::GET, ALIAS_PATH, None, None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["errcode"], "M_NOT_FOUND");
    }

    #[tokio::test]
    async fn second_create_conflicts() {
        let app = app(MockFederationClient::new());

        let (status, _) = send(&app, put_foo("@alice:example.org")).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, put_foo("@bob:example.org")).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "The alias #foo:example.org already exists.");
    }

    #[tokio::test]
    async fn create_without_requester_is_unauthorized() {
        let app = app(MockFederationClient::new());
        let req = request(
            Method::PUT,
            ALIAS_PATH,
            None,
            Some(r#"{"room_id":"!abc:example.org"}"#),
        );

        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["errcode"], "M_MISSING_TOKEN");
    }

    #[tokio::test]
    async fn create_with_bad_body_is_bad_json() {
        let app = app(MockFederationClient::new());

        let req = request(Method::PUT, ALIAS_PATH, Some("@alice:example.org"), Some("{"));
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errcode"], "M_BAD_JSON");

        let req = request(
            Method::PUT,
            ALIAS_PATH,
            Some("@alice:example.org"),
            Some(r#"{"room_id":"abc"}"#),
        );
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_on_foreign_domain_is_forbidden() {
        let app = app(MockFederationClient::new());
        let req = request(
            Method::PUT,
            "/_matrix/client/r0/directory/room/%23foo:remote.org",
            Some("@alice:example.org"),
            Some(r#"{"room_id":"!abc:example.org"}"#),
        );

        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Alias must be on local homeserver");
    }

    #[tokio::test]
    async fn foreign_domain_is_checked_before_the_body() {
        let app = app(MockFederationClient::new());

        for body in [r#"{"room_id":"abc"}"#, "{"] {
            let req = request(
                Method::PUT,
                "/_matrix/client/r0/directory/room/%23foo:remote.org",
                Some("@alice:example.org"),
                Some(body),
            );
            let (status, body) = send(&app, req).await;
            assert_eq!(status, StatusCode::FORBIDDEN);
            assert_eq!(body["errcode"], "M_FORBIDDEN");
        }
    }

    #[tokio::test]
    async fn malformed_alias_is_bad_request() {
        let app = app(MockFederationClient::new());
        let req = request(
            Method::GET,
            "/_matrix/client/r0/directory/room/foo",
            None,
            None,
        );

        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errcode"], "M_BAD_JSON");
    }

    #[tokio::test]
    async fn delete_by_non_owner_fails_and_keeps_alias() {
        let app = app(MockFederationClient::new());
        let (status, _) = send(&app, put_foo("@alice:example.org")).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            &app,
            request(Method::DELETE, ALIAS_PATH, Some("@mallory:example.org"), None),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["errcode"], "M_UNKNOWN");

        let (status, _) = send(&app, request(Method::GET, ALIAS_PATH, None, None)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn remote_alias_goes_to_federation() {
        let mut federation = MockFederationClient::new();
        federation
            .expect_lookup_alias()
            .withf(|destination, alias| {
                destination.as_str() == "remote.org" && alias.as_str() == "#bar:remote.org"
            })
            .times(1)
            .returning(|_, _| {
                let Ok(room_id) = crate::domain::RoomId::parse("!xyz:remote.org") else {
                    panic!("valid room id");
                };
                Ok(FederationDirectoryResponse {
                    room_id: Some(room_id),
                    servers: vec![ServerName::new("remote.org")],
                })
            });
        let app = app(federation);

        let req = request(
            Method::GET,
            "/_matrix/client/r0/directory/room/%23bar:remote.org",
            None,
            None,
        );
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["room_id"], "!xyz:remote.org");
    }

    #[tokio::test]
    async fn remote_rejection_keeps_status_and_errcode() {
        let mut federation = MockFederationClient::new();
        federation.expect_lookup_alias().times(1).returning(|destination, _| {
            Err(FederationError::rejected(
                destination,
                RemoteRejection {
                    status: 403,
                    errcode: "M_FORBIDDEN".to_string(),
                    error: "Federation denied".to_string(),
                },
            ))
        });
        let app = app(federation);

        let req = request(
            Method::GET,
            "/_matrix/client/r0/directory/room/%23bar:remote.org",
            None,
            None,
        );
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["errcode"], "M_FORBIDDEN");
        assert_eq!(body["error"], "Federation denied");
    }
}
