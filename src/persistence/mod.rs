//! Persistence layer: alias store adapters.
//!
//! [`InMemoryAliasStore`] serves single-node deployments and tests;
//! [`PostgresAliasStore`] keeps bindings in PostgreSQL via `sqlx::PgPool`.
//! Both implement [`crate::ports::AliasStore`].

pub mod memory;
pub mod postgres;

pub use memory::InMemoryAliasStore;
pub use postgres::PostgresAliasStore;
