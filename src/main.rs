//! alias-directory server entry point.
//!
//! Wires the alias store, bridge, and federation adapters into the resolver
//! and starts the Axum HTTP server.

use std::sync::Arc;

use anyhow::Context;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use alias_directory::api;
use alias_directory::app_state::AppState;
use alias_directory::appservice::AppServiceBridge;
use alias_directory::config::DirectoryConfig;
use alias_directory::federation::HttpFederationClient;
use alias_directory::persistence::{InMemoryAliasStore, PostgresAliasStore};
use alias_directory::ports::{AliasStore, BridgeQueryService, NoBridge};
use alias_directory::service::AliasResolver;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = DirectoryConfig::from_env()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;
    tracing::info!(
        addr = %config.listen_addr,
        server_name = %config.server_name,
        "starting alias-directory"
    );

    // Alias store
    let store: Arc<dyn AliasStore> = if config.persistence_enabled {
        let store = PostgresAliasStore::connect(&config)
            .await
            .context("connecting to PostgreSQL")?;
        store.migrate().await.context("applying migrations")?;
        tracing::info!("using PostgreSQL alias store");
        Arc::new(store)
    } else {
        tracing::info!("using in-memory alias store");
        Arc::new(InMemoryAliasStore::new())
    };

    // Application-service bridge
    let bridge: Arc<dyn BridgeQueryService> = if config.appservices.is_empty() {
        Arc::new(NoBridge)
    } else {
        let bridge = AppServiceBridge::new(config.appservices.clone(), config.upstream_timeout())
            .context("building application service client")?;
        tracing::info!(registrations = bridge.registration_count(), "application services enabled");
        Arc::new(bridge)
    };

    // Federation
    let federation = HttpFederationClient::new(config.federation_use_tls, config.upstream_timeout())
        .context("building federation client")?;

    // Build service layer
    let resolver = AliasResolver::new(
        config.server_name.clone(),
        store,
        bridge,
        Arc::new(federation),
    );
    let app_state = AppState::new(Arc::new(resolver), config.upstream_timeout());

    // Build router
    let app = api::build_router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
