//! # alias-directory
//!
//! Matrix room alias directory service.
//!
//! Resolves human-readable room aliases (`#localpart:domain`) to room ids,
//! and lets users create and remove aliases on this homeserver. Unknown
//! local aliases are offered to application services (bridges) once;
//! aliases on other servers are looked up over federation.
//!
//! ## Architecture
//!
//! ```text
//! Clients / remote servers (HTTP)
//!     │
//!     ├── Handlers (api/)
//!     │
//!     ├── AliasResolver (service/)
//!     │
//!     ├── Ports (ports/)
//!     │     ├── AliasStore ──────── InMemory / PostgreSQL (persistence/)
//!     │     ├── BridgeQueryService ─ AppServiceBridge (appservice/)
//!     │     ├── FederationClient ── HttpFederationClient (federation/)
//!     │     └── AliasPolicy
//!     │
//!     └── Identifiers and bindings (domain/)
//! ```

pub mod api;
pub mod app_state;
pub mod appservice;
pub mod config;
pub mod domain;
pub mod error;
pub mod federation;
pub mod persistence;
pub mod ports;
pub mod service;
