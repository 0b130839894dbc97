//! PostgreSQL implementation of the alias store.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::config::DirectoryConfig;
use crate::domain::{RoomAlias, RoomId, UserId};
use crate::ports::{AliasStore, AliasStoreError};

/// PostgreSQL-backed [`AliasStore`] using `sqlx::PgPool`.
///
/// Bindings live in `room_aliases`, keyed by alias. The primary key plus
/// `ON CONFLICT DO NOTHING` gives atomic create-if-absent.
#[derive(Debug, Clone)]
pub struct PostgresAliasStore {
    pool: PgPool,
}

impl PostgresAliasStore {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool sized from `config`.
    ///
    /// # Errors
    ///
    /// Returns the `sqlx` error if the database is unreachable.
    pub async fn connect(config: &DirectoryConfig) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Applies the bundled schema migrations.
    ///
    /// # Errors
    ///
    /// Returns the migration error if a migration fails to apply.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

#[async_trait]
impl AliasStore for PostgresAliasStore {
    async fn lookup(&self, alias: &RoomAlias) -> Result<Option<RoomId>, AliasStoreError> {
        let room_id = sqlx::query_scalar::<_, String>(
            "SELECT room_id FROM room_aliases WHERE alias = $1",
        )
        .bind(alias.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        room_id
            .map(RoomId::parse)
            .transpose()
            .map_err(|e| AliasStoreError::Backend {
                message: format!("stored room id for {alias} is invalid: {e}"),
            })
    }

    async fn create(
        &self,
        alias: &RoomAlias,
        room_id: &RoomId,
        owner: &UserId,
    ) -> Result<(), AliasStoreError> {
        let result = sqlx::query(
            "INSERT INTO room_aliases (alias, room_id, creator_id) VALUES ($1, $2, $3) \
             ON CONFLICT (alias) DO NOTHING",
        )
        .bind(alias.as_str())
        .bind(room_id.as_str())
        .bind(owner.as_str())
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        if result.rows_affected() == 0 {
            return Err(AliasStoreError::AlreadyExists(alias.clone()));
        }
        Ok(())
    }

    async fn delete(&self, alias: &RoomAlias, owner: &UserId) -> Result<(), AliasStoreError> {
        let result = sqlx::query("DELETE FROM room_aliases WHERE alias = $1 AND creator_id = $2")
            .bind(alias.as_str())
            .bind(owner.as_str())
            .execute(&self.pool)
            .await
            .map_err(backend)?;

        if result.rows_affected() == 0 {
            return Err(AliasStoreError::NotFound(alias.clone()));
        }
        Ok(())
    }
}

fn backend(err: sqlx::Error) -> AliasStoreError {
    AliasStoreError::Backend {
        message: err.to_string(),
    }
}
