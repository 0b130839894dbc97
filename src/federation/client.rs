//! Server-to-server directory query client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::domain::{RoomAlias, RoomId, ServerName};
use crate::ports::{FederationClient, FederationDirectoryResponse, FederationError, RemoteRejection};

/// Directory query response as sent on the wire.
#[derive(Debug, Deserialize)]
struct WireDirectoryResponse {
    #[serde(default)]
    room_id: String,
    #[serde(default)]
    servers: Vec<String>,
}

/// Matrix error body (`{"errcode": ..., "error": ...}`).
#[derive(Debug, Default, Deserialize)]
struct WireErrorBody {
    #[serde(default)]
    errcode: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Async HTTP client for `GET /_matrix/federation/v1/query/directory`.
///
/// Internally uses `reqwest` with a connection pool. No retries: one call,
/// one request.
#[derive(Debug, Clone)]
pub struct HttpFederationClient {
    http: Client,
    scheme: &'static str,
}

impl HttpFederationClient {
    /// Creates a federation client.
    ///
    /// # Errors
    ///
    /// Returns the `reqwest` error if the HTTP client cannot be built.
    pub fn new(use_tls: bool, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("alias-directory/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(http, use_tls))
    }

    /// Creates a federation client over an existing `reqwest` client.
    #[must_use]
    pub fn with_client(http: Client, use_tls: bool) -> Self {
        Self {
            http,
            scheme: if use_tls { "https" } else { "http" },
        }
    }

    /// Builds the directory query URL. The path is fixed; `destination`
    /// only ever supplies host and port, so a destination carrying a path,
    /// query, fragment, or userinfo is refused.
    fn directory_url(&self, destination: &ServerName, alias: &RoomAlias) -> Result<Url, String> {
        let (host, port) = split_host_port(destination.as_str())?;

        let mut url = Url::parse(&format!(
            "{}://localhost/_matrix/federation/v1/query/directory",
            self.scheme
        ))
        .map_err(|e| e.to_string())?;
        url.set_host(Some(host))
            .map_err(|e| format!("invalid destination {destination}: {e}"))?;
        url.set_port(port)
            .map_err(|()| format!("invalid destination {destination}: bad port"))?;
        url.query_pairs_mut().append_pair("room_alias", alias.as_str());
        Ok(url)
    }
}

/// Splits `host[:port]`. A trailing `:digits` is the port. Any colon left in
/// the host must sit inside an IPv6 literal; [`Url::set_host`] would
/// otherwise silently truncate at it.
fn split_host_port(destination: &str) -> Result<(&str, Option<u16>), String> {
    let (host, port) = match destination.rsplit_once(':') {
        Some((host, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => {
            let port = port
                .parse::<u16>()
                .map_err(|e| format!("invalid port in destination {destination}: {e}"))?;
            (host, Some(port))
        }
        _ => (destination, None),
    };

    let ip_literal = host.starts_with('[') && host.ends_with(']');
    if host.contains(':') && !ip_literal {
        return Err(format!("invalid destination {destination}: expected host[:port]"));
    }
    Ok((host, port))
}

#[async_trait]
impl FederationClient for HttpFederationClient {
    async fn lookup_alias(
        &self,
        destination: &ServerName,
        alias: &RoomAlias,
    ) -> Result<FederationDirectoryResponse, FederationError> {
        let url = self
            .directory_url(destination, alias)
            .map_err(|message| FederationError::transport(destination, message))?;
        tracing::debug!(%url, "federation GET");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| FederationError::transport(destination, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body: WireErrorBody = response.json().await.unwrap_or_default();
            return Err(FederationError::rejected(
                destination,
                RemoteRejection {
                    status: status.as_u16(),
                    errcode: body.errcode.unwrap_or_else(|| "M_UNKNOWN".to_string()),
                    error: body
                        .error
                        .unwrap_or_else(|| status.canonical_reason().unwrap_or_default().to_string()),
                },
            ));
        }

        let body: WireDirectoryResponse = response.json().await.map_err(|e| {
            FederationError::transport(destination, format!("malformed directory response: {e}"))
        })?;

        let room_id = if body.room_id.is_empty() {
            None
        } else {
            Some(RoomId::parse(body.room_id).map_err(|e| {
                FederationError::transport(destination, format!("invalid room id in response: {e}"))
            })?)
        };

        Ok(FederationDirectoryResponse {
            room_id,
            servers: body.servers.into_iter().map(ServerName::new).collect(),
        })
    }
}
