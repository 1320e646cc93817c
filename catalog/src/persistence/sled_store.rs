use crate::domain::{Product, ProductDraft, ProductId};
use crate::ports::PrimaryStore;
use async_trait::async_trait;
use shared::StoreError;
use std::path::Path;

const BACKEND: &str = "sled";
const PRODUCTS_TREE: &str = "products";

fn store_error(err: sled::Error) -> StoreError {
    match err {
        sled::Error::Io(io) => StoreError::connection(BACKEND, io),
        other => StoreError::query(BACKEND, other),
    }
}

fn encode_key(id: ProductId) -> [u8; 8] {
    id.to_be_bytes()
}

/// Sled-backed Primary Store for products
#[derive(Clone)]
pub struct SledProductStore {
    db: sled::Db,
    products: sled::Tree,
}

impl SledProductStore {
    /// Open (or create) the product database at `path`
    /// Creates the parent directory if it doesn't exist
    pub fn new(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::connection(BACKEND, e))?;
        }

        let db = sled::open(path).map_err(store_error)?;
        Self::from_db(db)
    }

    /// Open a throwaway database that is removed on drop
    pub fn temporary() -> Result<Self, StoreError> {
        let db = sled::Config::new()
            .temporary(true)
            .open()
            .map_err(store_error)?;
        Self::from_db(db)
    }

    fn from_db(db: sled::Db) -> Result<Self, StoreError> {
        let products = db.open_tree(PRODUCTS_TREE).map_err(store_error)?;
        Ok(Self { db, products })
    }

    fn decode(bytes: &[u8]) -> Result<Product, StoreError> {
        serde_json::from_slice(bytes).map_err(|e| StoreError::query(BACKEND, e))
    }

    async fn flush(&self) -> Result<(), StoreError> {
        self.products.flush_async().await.map_err(store_error)?;
        Ok(())
    }
}

#[async_trait]
impl PrimaryStore for SledProductStore {
    async fn insert(&self, draft: &ProductDraft) -> Result<ProductId, StoreError> {
        // generate_id starts at 0; product ids start at 1
        let id = self.db.generate_id().map_err(store_error)? as ProductId + 1;
        let product = Product::from_draft(id, draft.clone());
        let value = serde_json::to_vec(&product).map_err(|e| StoreError::query(BACKEND, e))?;

        self.products
            .insert(encode_key(id), value)
            .map_err(store_error)?;
        self.flush().await?;

        Ok(id)
    }

    async fn select_all(&self) -> Result<Vec<Product>, StoreError> {
        let mut products = Vec::new();

        for item in self.products.iter() {
            let (_, value) = item.map_err(store_error)?;
            products.push(Self::decode(&value)?);
        }

        Ok(products)
    }

    async fn select_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        match self.products.get(encode_key(id)).map_err(store_error)? {
            Some(value) => Ok(Some(Self::decode(&value)?)),
            None => Ok(None),
        }
    }

    async fn update_by_id(&self, id: ProductId, draft: &ProductDraft) -> Result<u64, StoreError> {
        let product = Product::from_draft(id, draft.clone());
        let value = serde_json::to_vec(&product).map_err(|e| StoreError::query(BACKEND, e))?;

        // Replace only an existing row, atomically with respect to a concurrent delete
        let previous = self
            .products
            .fetch_and_update(encode_key(id), |old| old.map(|_| value.clone()))
            .map_err(store_error)?;

        if previous.is_none() {
            return Ok(0);
        }

        self.flush().await?;
        Ok(1)
    }

    async fn delete_by_id(&self, id: ProductId) -> Result<u64, StoreError> {
        let removed = self
            .products
            .remove(encode_key(id))
            .map_err(store_error)?
            .is_some();

        if !removed {
            return Ok(0);
        }

        self.flush().await?;
        Ok(1)
    }
}

impl std::fmt::Debug for SledProductStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SledProductStore")
            .field("rows", &self.products.len())
            .finish()
    }
}
