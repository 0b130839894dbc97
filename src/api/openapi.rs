//! OpenAPI document for the HTTP API.

use utoipa::OpenApi;

use crate::api::dto::{EmptyResponse, RoomDirectoryResponse, SetAliasRequest};
use crate::api::handlers::system::HealthResponse;
use crate::error::ErrorResponse;

/// OpenAPI document covering the directory, federation, and system routes.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "alias-directory",
        description = "Matrix room alias directory: resolution, creation, and removal of room aliases."
    ),
    paths(
        crate::api::handlers::directory::get_room_alias,
        crate::api::handlers::directory::put_room_alias,
        crate::api::handlers::directory::delete_room_alias,
        crate::api::handlers::federation::query_directory,
        crate::api::handlers::system::health_handler,
    ),
    components(schemas(
        RoomDirectoryResponse,
        SetAliasRequest,
        EmptyResponse,
        ErrorResponse,
        HealthResponse,
    )),
    tags(
        (name = "Directory", description = "Client-server room alias directory"),
        (name = "Federation", description = "Server-to-server alias queries"),
        (name = "System", description = "Health and diagnostics"),
    )
)]
pub struct ApiDoc;
