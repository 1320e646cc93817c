use async_trait::async_trait;
use bytes::Bytes;
use catalog::ports::FastCache;
use moka::future::Cache;
use shared::StoreError;
use std::time::Duration;

/// Moka-backed Fast Cache
/// Lock-free and safe for concurrent populate/invalidate on the same key
pub struct MokaFastCache {
    cache: Cache<String, Bytes>,
}

impl MokaFastCache {
    /// Create a cache; entries never expire unless `ttl` is given
    pub fn new(name: &str, max_entries: Option<u64>, ttl: Option<Duration>) -> Self {
        let mut builder = Cache::builder().name(name);

        if let Some(capacity) = max_entries {
            builder = builder.max_capacity(capacity);
        }

        if let Some(ttl) = ttl {
            builder = builder.time_to_live(ttl);
        }

        Self {
            cache: builder.build(),
        }
    }

    pub fn unbounded() -> Self {
        Self::new("fast-cache", None, None)
    }
}

#[async_trait]
impl FastCache for MokaFastCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.cache.get(key).await.map(|value| value.to_vec()))
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        self.cache.insert(key.to_string(), Bytes::from(value)).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        // remove on a missing key is a no-op
        self.cache.invalidate(key).await;
        tracing::debug!(key, "cache entry invalidated");
        Ok(())
    }
}

impl std::fmt::Debug for MokaFastCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaFastCache")
            .field("entry_count", &self.cache.entry_count())
            .field("weighted_size", &self.cache.weighted_size())
            .finish()
    }
}
