//! Outbound federation adapter.
//!
//! [`HttpFederationClient`] implements [`crate::ports::FederationClient`]
//! with one plain `reqwest` request per lookup. Request signing and server
//! discovery are left to the deployment (e.g. an egress proxy).

pub mod client;

pub use client::HttpFederationClient;
