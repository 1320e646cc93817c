//! Cache-aside access to the product collection.
//!
//! Reads go to the Fast Cache first and fall back to the Primary Store on a
//! miss, repopulating the cache with what the store returned. Writes go to the
//! Primary Store and then delete the cached collection; the cache is never
//! updated in place. The next reader rebuilds it from the authoritative rows.
//!
//! Per collection key the cache entry is either absent or present:
//!
//! ```text
//! ABSENT --(list miss, populate)--> PRESENT --(write | corrupt entry)--> ABSENT
//! ```
//!
//! Between a committed write and the delete that follows it, a concurrent
//! reader may still see the previous collection.
//!
//! Every delete of the collection key bumps a generation counter. A reader
//! only populates the cache if the generation it saw before reading the
//! Primary Store is still current, so rows read before an invalidation are
//! never cached after it.

use crate::domain::{Product, ProductFields, ProductId};
use crate::ports::{FastCache, PrimaryStore};
use shared::{Error, Result, StoreError};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, error, info, warn};

const PRIMARY: &str = "primary store";
const CACHE: &str = "fast cache";

/// Cached bytes that no longer decode into a product collection.
///
/// Never leaves this module: the entry is dropped and the read falls through.
#[derive(Debug, thiserror::Error)]
#[error("cache entry is corrupt: {0}")]
pub(crate) struct CacheCorruption(#[from] serde_json::Error);

pub(crate) fn encode_collection(products: &[Product]) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(products)
}

pub(crate) fn decode_collection(bytes: &[u8]) -> std::result::Result<Vec<Product>, CacheCorruption> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Product collection served through a Fast Cache in front of a Primary Store
pub struct CacheAsideProductStore {
    primary: Arc<dyn PrimaryStore>,
    cache: Arc<dyn FastCache>,
    key: String,
    timeout: Option<Duration>,
    invalidation_failures: AtomicU64,
    generation: AtomicU64,
}

impl CacheAsideProductStore {
    pub fn new(
        primary: Arc<dyn PrimaryStore>,
        cache: Arc<dyn FastCache>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            primary,
            cache,
            key: key.into(),
            timeout: None,
            invalidation_failures: AtomicU64::new(0),
            generation: AtomicU64::new(0),
        }
    }

    /// Bound every Primary Store and Fast Cache call by `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn cache_key(&self) -> &str {
        &self.key
    }

    /// Number of writes whose cache invalidation failed since startup
    pub fn invalidation_failures(&self) -> u64 {
        self.invalidation_failures.load(Ordering::Relaxed)
    }

    /// Return the whole collection, from the cache when possible
    pub async fn list(&self) -> Result<Vec<Product>> {
        match self.bounded(CACHE, self.cache.get(&self.key)).await {
            Ok(Some(bytes)) => match decode_collection(&bytes) {
                Ok(products) => {
                    debug!(key = %self.key, count = products.len(), "cache hit");
                    return Ok(products);
                }
                Err(corruption) => {
                    warn!(key = %self.key, error = %corruption, "discarding unreadable cache entry");
                    self.discard().await;
                }
            },
            Ok(None) => debug!(key = %self.key, "cache miss"),
            Err(e) => {
                warn!(key = %self.key, error = %e, "cache read failed, reading from primary store")
            }
        }

        let generation = self.generation.load(Ordering::Acquire);
        let products = self.bounded(PRIMARY, self.primary.select_all()).await?;
        self.populate(&products, generation).await;

        Ok(products)
    }

    /// Point lookups always go to the Primary Store
    pub async fn get(&self, id: ProductId) -> Result<Product> {
        self.bounded(PRIMARY, self.primary.select_by_id(id))
            .await?
            .ok_or(Error::NotFound)
    }

    pub async fn create(&self, fields: ProductFields) -> Result<ProductId> {
        let draft = fields.validate()?;
        let id = self.bounded(PRIMARY, self.primary.insert(&draft)).await?;

        self.invalidate().await;
        info!(product_id = id, "product created");

        Ok(id)
    }

    pub async fn update(&self, id: ProductId, fields: ProductFields) -> Result<()> {
        let draft = fields.validate()?;
        let rows = self
            .bounded(PRIMARY, self.primary.update_by_id(id, &draft))
            .await?;

        if rows == 0 {
            return Err(Error::NotFound);
        }

        self.invalidate().await;
        info!(product_id = id, "product updated");

        Ok(())
    }

    pub async fn delete(&self, id: ProductId) -> Result<()> {
        let rows = self.bounded(PRIMARY, self.primary.delete_by_id(id)).await?;

        if rows == 0 {
            return Err(Error::NotFound);
        }

        self.invalidate().await;
        info!(product_id = id, "product deleted");

        Ok(())
    }

    /// Best-effort write of a freshly read collection.
    ///
    /// `generation` is the value observed before the rows were read. If an
    /// invalidation happened since, the rows may predate it and are not
    /// cached. The check is repeated after the write because an invalidation
    /// can land between the first check and the set.
    async fn populate(&self, products: &[Product], generation: u64) {
        if self.generation.load(Ordering::Acquire) != generation {
            debug!(key = %self.key, "collection invalidated during read, skipping populate");
            return;
        }

        let bytes = match encode_collection(products) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to encode collection, skipping populate");
                return;
            }
        };

        if let Err(e) = self.bounded(CACHE, self.cache.set(&self.key, bytes)).await {
            warn!(key = %self.key, error = %e, "failed to populate cache");
            return;
        }

        if self.generation.load(Ordering::Acquire) != generation {
            debug!(key = %self.key, "collection invalidated during populate, removing entry");
            self.remove().await;
        }
    }

    async fn discard(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        if let Err(e) = self.bounded(CACHE, self.cache.delete(&self.key)).await {
            warn!(key = %self.key, error = %e, "failed to delete corrupt cache entry");
        }
    }

    /// Delete the cached collection after a committed write.
    ///
    /// The write has already succeeded, so a failure here is not returned to
    /// the caller. It is counted and logged at error level instead: until the
    /// entry is removed, readers keep getting the pre-write collection.
    async fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        if let Err(e) = self.bounded(CACHE, self.cache.delete(&self.key)).await {
            let failures = self.invalidation_failures.fetch_add(1, Ordering::Relaxed) + 1;
            error!(
                key = %self.key,
                error = %e,
                failures,
                "cache invalidation failed after a committed write; cached collection is stale"
            );
        }
    }

    async fn remove(&self) {
        if let Err(e) = self.bounded(CACHE, self.cache.delete(&self.key)).await {
            warn!(key = %self.key, error = %e, "failed to remove superseded cache entry");
        }
    }

    async fn bounded<T, F>(&self, backend: &'static str, call: F) -> std::result::Result<T, StoreError>
    where
        F: Future<Output = std::result::Result<T, StoreError>>,
    {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .unwrap_or_else(|_| Err(StoreError::timed_out(backend, limit))),
            None => call.await,
        }
    }
}

impl std::fmt::Debug for CacheAsideProductStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheAsideProductStore")
            .field("key", &self.key)
            .field("timeout", &self.timeout)
            .field("invalidation_failures", &self.invalidation_failures())
            .finish()
    }
}
