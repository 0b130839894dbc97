//! HTTP API layer: route handlers, DTOs, extractors, and router composition.
//!
//! Routes follow the Matrix URL layout: client-server endpoints under
//! `/_matrix/client/r0`, federation endpoints under `/_matrix/federation/v1`.

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod openapi;

use axum::Router;

use crate::app_state::AppState;

/// Builds the complete router with all HTTP endpoints.
///
/// With the `swagger-ui` feature the OpenAPI document is served at
/// `/api-docs/openapi.json` and browsable at `/swagger-ui`.
pub fn build_router() -> Router<AppState> {
    let router = Router::new()
        .merge(handlers::routes())
        .merge(handlers::system::routes());

    #[cfg(feature = "swagger-ui")]
    let router = {
        use utoipa::OpenApi;
        router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
        )
    };

    router
}
