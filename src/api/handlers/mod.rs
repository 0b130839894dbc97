//! HTTP endpoint handlers organized by API surface.

pub mod directory;
pub mod federation;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes the client-server and federation routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(directory::routes())
        .merge(federation::routes())
}
