//! Alias resolver: the local → bridge → federation fallback protocol and
//! local alias lifecycle.

use std::fmt;
use std::sync::Arc;

use tokio::time::timeout_at;

use super::RequestContext;
use crate::domain::{RoomAlias, RoomDirectoryEntry, RoomId, ServerName, UserId};
use crate::error::DirectoryError;
use crate::ports::{
    AliasPolicy, AliasStore, AliasStoreError, AllowAllPolicy, BridgeQueryService,
    FederationClient, FederationError,
};

/// Orchestrates alias resolution across the alias store, the bridge
/// service, and the federation client.
///
/// Holds no mutable state of its own. Every call re-reads the store; nothing
/// is cached and nothing is retried. Per-alias atomicity is the store's job.
///
/// # Resolution order
///
/// 1. Parse the alias; reject malformed input before any I/O.
/// 2. Local alias: store lookup, then on a miss one bridge query, then on a
///    positive bridge answer one more store lookup.
/// 3. Remote alias: exactly one federation lookup against the alias domain.
pub struct AliasResolver {
    server_name: ServerName,
    store: Arc<dyn AliasStore>,
    bridge: Arc<dyn BridgeQueryService>,
    federation: Arc<dyn FederationClient>,
    policy: Arc<dyn AliasPolicy>,
}

impl AliasResolver {
    /// Creates a resolver for `server_name` that allows every mutation.
    #[must_use]
    pub fn new(
        server_name: ServerName,
        store: Arc<dyn AliasStore>,
        bridge: Arc<dyn BridgeQueryService>,
        federation: Arc<dyn FederationClient>,
    ) -> Self {
        Self {
            server_name,
            store,
            bridge,
            federation,
            policy: Arc::new(AllowAllPolicy),
        }
    }

    /// Replaces the authorization policy consulted on create and delete.
    #[must_use]
    pub fn with_policy(mut self, policy: Arc<dyn AliasPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the server name aliases are classified against.
    #[must_use]
    pub fn server_name(&self) -> &ServerName {
        &self.server_name
    }

    /// Resolves an alias to a room and a list of join servers.
    ///
    /// # Errors
    ///
    /// - [`DirectoryError::MalformedAlias`] if `raw_alias` is not `#localpart:domain`.
    /// - [`DirectoryError::AliasNotFound`] if neither the store, the bridge,
    ///   nor the remote server knows the alias.
    /// - [`DirectoryError::RemoteApplicationError`] if the remote server
    ///   answered with an error.
    /// - [`DirectoryError::UpstreamUnavailable`] on bridge or federation
    ///   transport failure or deadline expiry.
    /// - [`DirectoryError::Store`] if the alias store fails.
    pub async fn resolve_alias(
        &self,
        ctx: &RequestContext,
        raw_alias: &str,
    ) -> Result<RoomDirectoryEntry, DirectoryError> {
        let alias = parse_alias(raw_alias)?;

        if alias.is_local_to(&self.server_name) {
            self.resolve_local(ctx, &alias)
                .await?
                .map(RoomDirectoryEntry::local)
                .ok_or_else(|| not_found(&alias))
        } else {
            self.resolve_remote(ctx, &alias).await
        }
    }

    /// Answers a remote server's directory query for one of our aliases.
    ///
    /// Runs the local path only (store, bridge, store) and advertises this
    /// server as the join server. Aliases of other servers are reported as
    /// not found; federation queries are never proxied.
    ///
    /// # Errors
    ///
    /// Same as [`Self::resolve_alias`], minus the federation outcomes.
    pub async fn resolve_for_federation(
        &self,
        ctx: &RequestContext,
        raw_alias: &str,
    ) -> Result<RoomDirectoryEntry, DirectoryError> {
        let alias = parse_alias(raw_alias)?;
        if !alias.is_local_to(&self.server_name) {
            tracing::debug!(%alias, "federation query for foreign alias");
            return Err(not_found(&alias));
        }

        let room_id = self
            .resolve_local(ctx, &alias)
            .await?
            .ok_or_else(|| not_found(&alias))?;

        Ok(RoomDirectoryEntry {
            room_id,
            servers: vec![self.server_name.clone()],
        })
    }

    /// Parses an alias that is about to be created and checks it belongs to
    /// this server.
    ///
    /// # Errors
    ///
    /// - [`DirectoryError::MalformedAlias`] if `raw_alias` is not `#localpart:domain`.
    /// - [`DirectoryError::ForbiddenDomain`] if the alias is not on this server.
    pub fn local_alias(&self, raw_alias: &str) -> Result<RoomAlias, DirectoryError> {
        let alias = parse_alias(raw_alias)?;
        if !alias.is_local_to(&self.server_name) {
            return Err(DirectoryError::ForbiddenDomain(alias.to_string()));
        }
        Ok(alias)
    }

    /// Binds a local alias to `room_id` on behalf of `owner`.
    ///
    /// # Errors
    ///
    /// - [`DirectoryError::MalformedAlias`] if `raw_alias` is not `#localpart:domain`.
    /// - [`DirectoryError::ForbiddenDomain`] if the alias is not on this server.
    /// - [`DirectoryError::PolicyDenied`] if the alias policy refuses.
    /// - [`DirectoryError::AliasAlreadyExists`] if the alias is already bound.
    /// - [`DirectoryError::Store`] on any other store failure.
    pub async fn create_local_alias(
        &self,
        raw_alias: &str,
        room_id: &RoomId,
        owner: &UserId,
    ) -> Result<(), DirectoryError> {
        let alias = self.local_alias(raw_alias)?;

        self.policy.authorize_create(owner, &alias, room_id).await?;

        match self.store.create(&alias, room_id, owner).await {
            Ok(()) => {
                tracing::info!(%alias, %room_id, %owner, "alias created");
                Ok(())
            }
            Err(AliasStoreError::AlreadyExists(_)) => {
                Err(DirectoryError::AliasAlreadyExists(alias.to_string()))
            }
            Err(err) => {
                tracing::error!(%alias, error = %err, "alias store create failed");
                Err(DirectoryError::Store(err.to_string()))
            }
        }
    }

    /// Removes a local alias on behalf of `owner`.
    ///
    /// Ownership is decided by the store. Every failure other than a policy
    /// denial is reported as one generic error; "no such alias", "not the
    /// owner", and backend failures are only told apart in the logs.
    ///
    /// # Errors
    ///
    /// - [`DirectoryError::PolicyDenied`] if the alias policy refuses.
    /// - [`DirectoryError::AliasRemovalFailed`] on any other failure.
    pub async fn delete_local_alias(
        &self,
        raw_alias: &str,
        owner: &UserId,
    ) -> Result<(), DirectoryError> {
        let alias = RoomAlias::parse(raw_alias).map_err(|err| {
            tracing::warn!(alias = raw_alias, error = %err, "cannot remove malformed alias");
            DirectoryError::AliasRemovalFailed(err.to_string())
        })?;

        self.policy.authorize_delete(owner, &alias).await?;

        self.store.delete(&alias, owner).await.map_err(|err| {
            tracing::error!(%alias, %owner, error = %err, "alias removal failed");
            DirectoryError::AliasRemovalFailed(err.to_string())
        })?;

        tracing::info!(%alias, %owner, "alias removed");
        Ok(())
    }

    /// Store, then bridge, then store again. `None` means nobody knows it.
    async fn resolve_local(
        &self,
        ctx: &RequestContext,
        alias: &RoomAlias,
    ) -> Result<Option<RoomId>, DirectoryError> {
        if let Some(room_id) = self.lookup(alias).await? {
            tracing::debug!(%alias, %room_id, "alias resolved from store");
            return Ok(Some(room_id));
        }

        if !self.ask_bridge(ctx, alias).await? {
            tracing::debug!(%alias, "alias unknown to store and bridge");
            return Ok(None);
        }

        let room_id = self.lookup(alias).await?;
        match &room_id {
            Some(room_id) => tracing::debug!(%alias, %room_id, "alias resolved after bridge query"),
            None => tracing::warn!(%alias, "bridge claimed alias but store has no binding"),
        }
        Ok(room_id)
    }

    async fn resolve_remote(
        &self,
        ctx: &RequestContext,
        alias: &RoomAlias,
    ) -> Result<RoomDirectoryEntry, DirectoryError> {
        let destination = alias.server_name();
        tracing::debug!(%alias, %destination, "querying remote server for alias");

        if ctx.is_expired() {
            tracing::warn!(%alias, %destination, "deadline passed before federation lookup");
            return Err(DirectoryError::UpstreamUnavailable(format!(
                "deadline passed before querying {destination}"
            )));
        }

        let lookup = self.federation.lookup_alias(&destination, alias);
        let response = match timeout_at(ctx.deadline(), lookup).await {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => return Err(map_federation_error(alias, err)),
            Err(_) => {
                tracing::warn!(%alias, %destination, "federation lookup timed out");
                return Err(DirectoryError::UpstreamUnavailable(format!(
                    "federation lookup against {destination} timed out"
                )));
            }
        };

        match response.room_id {
            Some(room_id) => Ok(RoomDirectoryEntry {
                room_id,
                servers: response.servers,
            }),
            None => Err(not_found(alias)),
        }
    }

    async fn lookup(&self, alias: &RoomAlias) -> Result<Option<RoomId>, DirectoryError> {
        self.store.lookup(alias).await.map_err(|err| {
            tracing::error!(%alias, error = %err, "alias store lookup failed");
            DirectoryError::Store(err.to_string())
        })
    }

    async fn ask_bridge(
        &self,
        ctx: &RequestContext,
        alias: &RoomAlias,
    ) -> Result<bool, DirectoryError> {
        if ctx.is_expired() {
            tracing::warn!(%alias, "deadline passed before bridge query");
            return Err(DirectoryError::UpstreamUnavailable(format!(
                "deadline passed before bridge query for {alias}"
            )));
        }

        match timeout_at(ctx.deadline(), self.bridge.alias_exists(alias)).await {
            Ok(Ok(exists)) => Ok(exists),
            Ok(Err(err)) => {
                tracing::error!(%alias, error = %err, "bridge query failed");
                Err(DirectoryError::UpstreamUnavailable(err.to_string()))
            }
            Err(_) => {
                tracing::warn!(%alias, "bridge query timed out");
                Err(DirectoryError::UpstreamUnavailable(format!(
                    "bridge query for {alias} timed out"
                )))
            }
        }
    }
}

impl fmt::Debug for AliasResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AliasResolver")
            .field("server_name", &self.server_name)
            .finish_non_exhaustive()
    }
}

fn parse_alias(raw_alias: &str) -> Result<RoomAlias, DirectoryError> {
    RoomAlias::parse(raw_alias).map_err(|source| DirectoryError::MalformedAlias {
        alias: raw_alias.to_string(),
        source,
    })
}

fn not_found(alias: &RoomAlias) -> DirectoryError {
    DirectoryError::AliasNotFound(alias.to_string())
}

/// Remote rejections pass through with the remote's signal; everything
/// else collapses to upstream-unavailable.
fn map_federation_error(alias: &RoomAlias, err: FederationError) -> DirectoryError {
    let FederationError {
        destination,
        message,
        remote,
    } = err;

    match remote {
        Some(rejection) => {
            tracing::info!(
                %alias,
                %destination,
                status = rejection.status,
                errcode = %rejection.errcode,
                "remote server rejected alias lookup"
            );
            DirectoryError::RemoteApplicationError {
                destination: destination.to_string(),
                status: rejection.status,
                errcode: rejection.errcode,
                error: rejection.error,
            }
        }
        None => {
            tracing::error!(%alias, %destination, error = %message, "federation lookup failed");
            DirectoryError::UpstreamUnavailable(message)
        }
    }
}
