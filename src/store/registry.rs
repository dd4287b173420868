// Store registry - lazily created, independently clearable stores

use super::models::{CacheKey, CachedEntry, StoreId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

type StoreMap = HashMap<String, HashMap<CacheKey, CachedEntry>>;

/// Registry of named stores backing the worker.
///
/// Concurrent opens, reads and writes are safe; read-modify-write sequences
/// are not serialized, so two handlers writing the same key race and the
/// last writer wins. That matches the platform storage semantics this
/// registry stands in for.
#[derive(Clone, Default)]
pub struct StoreRegistry {
    stores: Arc<RwLock<StoreMap>>,
}

impl StoreRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a store, creating it if absent.
    pub async fn open(&self, id: &StoreId) -> StoreHandle {
        let qualified = id.qualified();
        let mut stores = self.stores.write().await;
        if !stores.contains_key(&qualified) {
            debug!(store = %qualified, "creating store");
            stores.insert(qualified.clone(), HashMap::new());
        }
        StoreHandle {
            qualified,
            stores: Arc::clone(&self.stores),
        }
    }

    /// Qualified names of every existing store.
    pub async fn names(&self) -> Vec<String> {
        self.stores.read().await.keys().cloned().collect()
    }

    pub async fn contains(&self, qualified: &str) -> bool {
        self.stores.read().await.contains_key(qualified)
    }

    /// Delete a whole store. Returns whether it existed.
    pub async fn delete(&self, qualified: &str) -> bool {
        let removed = self.stores.write().await.remove(qualified).is_some();
        if removed {
            debug!(store = %qualified, "deleted store");
        }
        removed
    }
}

/// Handle to one open store.
///
/// Handles stay valid across a concurrent deletion of the store; reads then
/// miss and writes recreate it, mirroring lazy creation on first use.
#[derive(Clone)]
pub struct StoreHandle {
    qualified: String,
    stores: Arc<RwLock<StoreMap>>,
}

impl StoreHandle {
    pub fn name(&self) -> &str {
        &self.qualified
    }

    pub async fn lookup(&self, key: &CacheKey) -> Option<CachedEntry> {
        self.stores
            .read()
            .await
            .get(&self.qualified)
            .and_then(|entries| entries.get(key).cloned())
    }

    /// Insert an entry, replacing any previous entry for the same key.
    pub async fn put(&self, entry: CachedEntry) {
        self.stores
            .write()
            .await
            .entry(self.qualified.clone())
            .or_default()
            .insert(entry.key.clone(), entry);
    }

    pub async fn delete(&self, key: &CacheKey) -> bool {
        self.stores
            .write()
            .await
            .get_mut(&self.qualified)
            .map(|entries| entries.remove(key).is_some())
            .unwrap_or(false)
    }

    pub async fn keys(&self) -> Vec<CacheKey> {
        self.stores
            .read()
            .await
            .get(&self.qualified)
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub async fn len(&self) -> usize {
        self.stores
            .read()
            .await
            .get(&self.qualified)
            .map(|entries| entries.len())
            .unwrap_or(0)
    }

    pub async fn clear(&self) {
        if let Some(entries) = self.stores.write().await.get_mut(&self.qualified) {
            entries.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Response, StoredType};
    use bytes::Bytes;

    fn entry(url: &str) -> CachedEntry {
        let response = Response::new(200, StoredType::Basic, HashMap::new(), Bytes::from_static(b"x"));
        CachedEntry::from_response(CacheKey::get(url), &response)
    }

    #[tokio::test]
    async fn test_lazy_creation_and_lookup() {
        let registry = StoreRegistry::new();
        assert!(registry.names().await.is_empty());

        let shell = registry.open(&StoreId::new("app-shell", "v1")).await;
        assert!(registry.contains("app-shell-v1").await);

        assert!(shell.lookup(&CacheKey::get("/app.js")).await.is_none());
        shell.put(entry("/app.js")).await;
        assert!(shell.lookup(&CacheKey::get("/app.js")).await.is_some());
        assert_eq!(shell.len().await, 1);
    }

    #[tokio::test]
    async fn test_last_writer_wins() {
        let registry = StoreRegistry::new();
        let data = registry.open(&StoreId::new("app-data", "v1")).await;

        let first = entry("/api/parts");
        data.put(first).await;

        let mut second = entry("/api/parts");
        second.body = Bytes::from_static(b"newer");
        data.put(second).await;

        assert_eq!(data.len().await, 1);
        let stored = data.lookup(&CacheKey::get("/api/parts")).await.unwrap();
        assert_eq!(stored.body, Bytes::from_static(b"newer"));
    }

    #[tokio::test]
    async fn test_delete_store() {
        let registry = StoreRegistry::new();
        let shell = registry.open(&StoreId::new("app-shell", "v1")).await;
        shell.put(entry("/")).await;

        assert!(registry.delete("app-shell-v1").await);
        assert!(!registry.delete("app-shell-v1").await);
        // Stale handle reads miss, writes recreate
        assert!(shell.lookup(&CacheKey::get("/")).await.is_none());
        shell.put(entry("/")).await;
        assert!(registry.contains("app-shell-v1").await);
    }

    #[test]
    fn test_clear_store() {
        tokio_test::block_on(async {
            let registry = StoreRegistry::new();
            let data = registry.open(&StoreId::new("app-data", "v1")).await;
            data.put(entry("/api/a")).await;
            data.put(entry("/api/b")).await;

            data.clear().await;
            assert_eq!(data.len().await, 0);
            // Clearing empties the store but does not delete it
            assert!(registry.contains("app-data-v1").await);
        });
    }
}
