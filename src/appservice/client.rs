//! HTTP client for the application-service room alias query.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::Url;

use crate::config::AppServiceRegistration;
use crate::domain::RoomAlias;
use crate::ports::{BridgeError, BridgeQueryService};

/// Queries registered application services for unknown local aliases.
///
/// `GET {url}/_matrix/app/v1/rooms/{alias}` with the homeserver token as a
/// bearer credential. A 2xx answer means the application service now owns
/// the alias (and has usually just created the room and registered the
/// binding); 404 means "not mine", and the next matching service is tried.
#[derive(Debug, Clone)]
pub struct AppServiceBridge {
    http: Client,
    registrations: Vec<AppServiceRegistration>,
}

impl AppServiceBridge {
    /// Creates a bridge client with its own connection pool.
    ///
    /// # Errors
    ///
    /// Returns the `reqwest` error if the HTTP client cannot be built.
    pub fn new(
        registrations: Vec<AppServiceRegistration>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("alias-directory/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(http, registrations))
    }

    /// Creates a bridge client over an existing `reqwest` client.
    #[must_use]
    pub fn with_client(http: Client, registrations: Vec<AppServiceRegistration>) -> Self {
        Self {
            http,
            registrations,
        }
    }

    /// Returns the number of registered application services.
    #[must_use]
    pub fn registration_count(&self) -> usize {
        self.registrations.len()
    }
}

/// Builds `{base}/_matrix/app/v1/rooms/{alias}` with the alias
/// percent-encoded as a single path segment.
fn room_alias_url(base: &str, alias: &RoomAlias) -> Result<Url, String> {
    let mut url = Url::parse(base).map_err(|e| format!("invalid application service url: {e}"))?;
    url.path_segments_mut()
        .map_err(|()| format!("application service url {base} cannot be a base"))?
        .pop_if_empty()
        .extend(["_matrix", "app", "v1", "rooms", alias.as_str()]);
    Ok(url)
}

#[async_trait]
impl BridgeQueryService for AppServiceBridge {
    async fn alias_exists(&self, alias: &RoomAlias) -> Result<bool, BridgeError> {
        let claiming = self
            .registrations
            .iter()
            .filter(|registration| registration.claims_alias(alias.as_str()));

        for registration in claiming {
            let url = room_alias_url(&registration.url, alias)
                .map_err(|message| BridgeError::new(alias, message))?;
            tracing::debug!(%alias, appservice = %registration.url, "querying application service");

            let response = self
                .http
                .get(url)
                .bearer_auth(&registration.hs_token)
                .send()
                .await
                .map_err(|e| BridgeError::new(alias, e.to_string()))?;

            let status = response.status();
            if status.is_success() {
                tracing::info!(%alias, appservice = %registration.url, "application service claimed alias");
                return Ok(true);
            }
            if status == StatusCode::NOT_FOUND {
                continue;
            }
            return Err(BridgeError::new(
                alias,
                format!("application service {} returned {status}", registration.url),
            ));
        }

        Ok(false)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::Router;
    use axum::extract::Path;
    use axum::http::{HeaderMap, StatusCode as AxumStatus};
    use axum::routing::get;
    use regex::Regex;

    use super::*;

    fn alias(raw: &str) -> RoomAlias {
        let Ok(alias) = RoomAlias::parse(raw) else {
            panic!("valid alias");
        };
        alias
    }

    fn registration(url: &str, namespace: &str) -> AppServiceRegistration {
        let Ok(alias_namespace) = Regex::new(namespace) else {
            panic!("valid regex");
        };
        AppServiceRegistration {
            url: url.to_string(),
            hs_token: "hs_secret".to_string(),
            alias_namespace,
        }
    }

    fn bridge(registrations: Vec<AppServiceRegistration>) -> AppServiceBridge {
        let Ok(bridge) = AppServiceBridge::new(registrations, Duration::from_secs(5)) else {
            panic!("client build failed");
        };
        bridge
    }

    async fn serve(router: Router) -> SocketAddr {
        let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
            panic!("bind failed");
        };
        let Ok(addr) = listener.local_addr() else {
            panic!("no local addr");
        };
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        addr
    }

    #[test]
    fn alias_is_encoded_as_one_path_segment() {
        let Ok(url) = room_alias_url("http://as.local/base/", &alias("#irc_#chan:example.org"))
        else {
            panic!("url build failed");
        };
        assert_eq!(
            url.as_str(),
            "http://as.local/base/_matrix/app/v1/rooms/%23irc_%23chan:example.org"
        );
    }

    #[tokio::test]
    async fn no_matching_namespace_means_no_request() {
        // Port 1 is never listening; a request would fail.
        let bridge = bridge(vec![registration("http://127.0.0.1:1", "^#irc_")]);
        let result = bridge.alias_exists(&alias("#foo:example.org")).await;
        assert_eq!(result, Ok(false));
    }

    #[tokio::test]
    async fn claimed_alias_exists_and_token_is_sent() {
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&hits);
        let router = Router::new().route(
            "/_matrix/app/v1/rooms/{alias}",
            get(move |Path(alias): Path<String>, headers: HeaderMap| {
                let seen = Arc::clone(&seen);
                async move {
                    seen.fetch_add(1, Ordering::SeqCst);
                    let authorized = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        == Some("Bearer hs_secret");
                    if authorized && alias == "#irc_foo:example.org" {
                        AxumStatus::OK
                    } else {
                        AxumStatus::NOT_FOUND
                    }
                }
            }),
        );
        let addr = serve(router).await;

        let bridge = bridge(vec![registration(&format!("http://{addr}"), "^#irc_")]);
        let result = bridge.alias_exists(&alias("#irc_foo:example.org")).await;

        assert_eq!(result, Ok(true));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn not_found_falls_through_to_next_service() {
        let missing = serve(Router::new().route(
            "/_matrix/app/v1/rooms/{alias}",
            get(|| async { AxumStatus::NOT_FOUND }),
        ))
        .await;
        let owning = serve(Router::new().route(
            "/_matrix/app/v1/rooms/{alias}",
            get(|| async { AxumStatus::OK }),
        ))
        .await;

        let bridge = bridge(vec![
            registration(&format!("http://{missing}"), ".*"),
            registration(&format!("http://{owning}"), ".*"),
        ]);
        let result = bridge.alias_exists(&alias("#foo:example.org")).await;
        assert_eq!(result, Ok(true));
    }

    #[tokio::test]
    async fn all_not_found_is_false() {
        let addr = serve(Router::new().route(
            "/_matrix/app/v1/rooms/{alias}",
            get(|| async { AxumStatus::NOT_FOUND }),
        ))
        .await;

        let bridge = bridge(vec![registration(&format!("http://{addr}"), ".*")]);
        let result = bridge.alias_exists(&alias("#foo:example.org")).await;
        assert_eq!(result, Ok(false));
    }

    #[tokio::test]
    async fn unexpected_status_is_an_error() {
        let addr = serve(Router::new().route(
            "/_matrix/app/v1/rooms/{alias}",
            get(|| async { AxumStatus::INTERNAL_SERVER_ERROR }),
        ))
        .await;

        let bridge = bridge(vec![registration(&format!("http://{addr}"), ".*")]);
        let result = bridge.alias_exists(&alias("#foo:example.org")).await;
        assert!(result.is_err());
    }
}
