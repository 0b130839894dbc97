//! Shared application state injected into all Axum handlers.

use std::sync::Arc;
use std::time::Duration;

use crate::service::{AliasResolver, RequestContext};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Alias resolution and management.
    pub alias_resolver: Arc<AliasResolver>,
    /// Budget for bridge and federation calls made while serving one request.
    pub upstream_timeout: Duration,
}

impl AppState {
    /// Creates the state.
    #[must_use]
    pub fn new(alias_resolver: Arc<AliasResolver>, upstream_timeout: Duration) -> Self {
        Self {
            alias_resolver,
            upstream_timeout,
        }
    }

    /// Starts the deadline for a request arriving now.
    #[must_use]
    pub fn request_context(&self) -> RequestContext {
        RequestContext::with_timeout(self.upstream_timeout)
    }
}
