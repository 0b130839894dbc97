//! Collaborator ports consumed by the alias resolver.
//!
//! Each port is an object-safe async trait so the resolver can hold
//! `Arc<dyn Port>` and tests can swap in mocks. Concrete adapters live in
//! [`crate::persistence`], [`crate::appservice`], and [`crate::federation`].

pub mod alias_store;
pub mod bridge;
pub mod federation;
pub mod policy;

pub use alias_store::{AliasStore, AliasStoreError};
pub use bridge::{BridgeError, BridgeQueryService, NoBridge};
pub use federation::{
    FederationClient, FederationDirectoryResponse, FederationError, RemoteRejection,
};
pub use policy::{AliasPolicy, AllowAllPolicy, PolicyDenial};

#[cfg(test)]
pub use alias_store::MockAliasStore;
#[cfg(test)]
pub use bridge::MockBridgeQueryService;
#[cfg(test)]
pub use federation::MockFederationClient;
#[cfg(test)]
pub use policy::MockAliasPolicy;
