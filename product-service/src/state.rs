use catalog::CacheAsideProductStore;
use catalog::auth::{StaticSecret, TokenKeys, TokenVerifier};
use catalog::persistence::SledProductStore;
use shared::StoreError;
use shared::config::Config;
use std::path::Path;
use std::sync::Arc;
use storage_engine::MokaFastCache;

/// Server state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub products: Arc<CacheAsideProductStore>,
    pub verifier: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(products: Arc<CacheAsideProductStore>, verifier: Arc<TokenVerifier>) -> Self {
        Self { products, verifier }
    }

    /// Open the Primary Store, build the Fast Cache and the token verifier.
    /// Every handle is created once here and injected into the handlers.
    pub fn from_config(config: &Config) -> Result<Self, StoreError> {
        let products_path = Path::new(&config.data_dir).join("products.sled");
        let primary = Arc::new(SledProductStore::new(products_path)?);
        let cache = Arc::new(MokaFastCache::new(&config.cache_key, None, config.cache_ttl));

        let products = CacheAsideProductStore::new(primary, cache, config.cache_key.clone())
            .with_timeout(config.store_timeout);

        let keys = TokenKeys::from_provider(&StaticSecret::new(config.jwt_secret.clone()));

        Ok(Self::new(
            Arc::new(products),
            Arc::new(TokenVerifier::new(keys)),
        ))
    }
}
