use crate::domain::{Product, ProductDraft, ProductId};
use async_trait::async_trait;
use shared::StoreError;

// Ports are the pluggable extension points for the backing stores

/// Port for the durable, authoritative product store
#[async_trait]
pub trait PrimaryStore: Send + Sync + 'static {
    /// Insert a row and return the id the store assigned to it
    async fn insert(&self, draft: &ProductDraft) -> Result<ProductId, StoreError>;
    async fn select_all(&self) -> Result<Vec<Product>, StoreError>;
    async fn select_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError>;
    /// Returns the number of rows affected (0 when no row matched)
    async fn update_by_id(&self, id: ProductId, draft: &ProductDraft) -> Result<u64, StoreError>;
    /// Returns the number of rows affected (0 when no row matched)
    async fn delete_by_id(&self, id: ProductId) -> Result<u64, StoreError>;
}

/// Port for the ephemeral key-value cache in front of the Primary Store
#[async_trait]
pub trait FastCache: Send + Sync + 'static {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;
    /// Deleting an absent key is not an error
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}
