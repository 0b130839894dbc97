//! Application-service (bridge) adapter.
//!
//! [`AppServiceBridge`] implements [`crate::ports::BridgeQueryService`] by
//! asking each registered application service whose alias namespace
//! matches whether it knows the alias.

pub mod client;

pub use client::AppServiceBridge;
