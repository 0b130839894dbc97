//! In-memory alias store for single-node deployments and tests.
//!
//! [`InMemoryAliasStore`] keeps every binding in a `HashMap` behind a
//! [`tokio::sync::RwLock`]. Creates take the write lock for the whole
//! check-and-insert, which makes create-if-absent atomic per alias.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{AliasBinding, RoomAlias, RoomId, UserId};
use crate::ports::{AliasStore, AliasStoreError};

/// Process-local [`AliasStore`].
///
/// # Concurrency
///
/// - Lookups run concurrently under the read lock.
/// - Creates and deletes are serialized under the write lock.
/// - Deletes only succeed for the binding's owner.
#[derive(Debug, Default)]
pub struct InMemoryAliasStore {
    bindings: RwLock<HashMap<RoomAlias, AliasBinding>>,
}

impl InMemoryAliasStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the full binding for `alias`, if any.
    pub async fn binding(&self, alias: &RoomAlias) -> Option<AliasBinding> {
        self.bindings.read().await.get(alias).cloned()
    }

    /// Returns the number of bindings.
    pub async fn len(&self) -> usize {
        self.bindings.read().await.len()
    }

    /// Returns `true` if the store holds no bindings.
    pub async fn is_empty(&self) -> bool {
        self.bindings.read().await.is_empty()
    }
}

#[async_trait]
impl AliasStore for InMemoryAliasStore {
    async fn lookup(&self, alias: &RoomAlias) -> Result<Option<RoomId>, AliasStoreError> {
        let map = self.bindings.read().await;
        Ok(map.get(alias).map(|binding| binding.room_id.clone()))
    }

    async fn create(
        &self,
        alias: &RoomAlias,
        room_id: &RoomId,
        owner: &UserId,
    ) -> Result<(), AliasStoreError> {
        let mut map = self.bindings.write().await;
        if map.contains_key(alias) {
            return Err(AliasStoreError::AlreadyExists(alias.clone()));
        }
        map.insert(
            alias.clone(),
            AliasBinding::new(alias.clone(), room_id.clone(), owner.clone()),
        );
        Ok(())
    }

    async fn delete(&self, alias: &RoomAlias, owner: &UserId) -> Result<(), AliasStoreError> {
        let mut map = self.bindings.write().await;
        match map.get(alias) {
            Some(binding) if binding.is_owned_by(owner) => {
                map.remove(alias);
                Ok(())
            }
            _ => Err(AliasStoreError::NotFound(alias.clone())),
        }
    }
}
