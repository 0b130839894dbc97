//! Data Transfer Objects for request/response serialization.
//!
//! Field names follow the Matrix client-server and federation APIs.

pub mod directory_dto;

pub use directory_dto::*;
