//! In-memory store, used by tests and short-lived processes.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{CacheStorage, validate_name};
use crate::error::CacheResult;
use crate::response::AssetResponse;

type Store = BTreeMap<String, AssetResponse>;

/// Stores kept in a map behind a single lock.
#[derive(Debug, Default)]
pub struct MemoryCacheStorage {
    stores: RwLock<BTreeMap<String, Store>>,
}

impl MemoryCacheStorage {
    /// Create an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStorage for MemoryCacheStorage {
    async fn keys(&self) -> CacheResult<Vec<String>> {
        Ok(self.stores.read().await.keys().cloned().collect())
    }

    async fn has(&self, name: &str) -> CacheResult<bool> {
        Ok(self.stores.read().await.contains_key(name))
    }

    async fn delete(&self, name: &str) -> CacheResult<bool> {
        Ok(self.stores.write().await.remove(name).is_some())
    }

    async fn put_all(&self, name: &str, responses: Vec<AssetResponse>) -> CacheResult<()> {
        validate_name(name)?;
        let mut stores = self.stores.write().await;
        let store = stores.entry(name.to_string()).or_default();
        for response in responses {
            store.insert(response.url.clone(), response);
        }
        Ok(())
    }

    async fn lookup(&self, name: &str, url: &str) -> CacheResult<Option<AssetResponse>> {
        Ok(self
            .stores
            .read()
            .await
            .get(name)
            .and_then(|store| store.get(url))
            .cloned())
    }

    async fn entries(&self, name: &str) -> CacheResult<Vec<String>> {
        Ok(self
            .stores
            .read()
            .await
            .get(name)
            .map(|store| store.keys().cloned().collect())
            .unwrap_or_default())
    }
}
