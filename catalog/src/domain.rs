use serde::{Deserialize, Serialize};
use shared::ValidationError;

pub type ProductId = i64;

/// A product row as owned by the Primary Store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub stock: i64,
}

impl Product {
    pub fn from_draft(id: ProductId, draft: ProductDraft) -> Self {
        Self {
            id,
            name: draft.name,
            price: draft.price,
            stock: draft.stock,
        }
    }
}

/// Unvalidated field set as supplied by a caller.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ProductFields {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
}

impl ProductFields {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: Some(name.into()),
            price: Some(price),
            stock: None,
        }
    }

    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = Some(stock);
        self
    }

    /// Check the field set and produce the full row contents to write.
    ///
    /// Name and price are required; a missing stock means 0.
    pub fn validate(self) -> Result<ProductDraft, ValidationError> {
        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or(ValidationError::MissingField { field: "name" })?;

        let price = self
            .price
            .ok_or(ValidationError::MissingField { field: "price" })?;
        if !price.is_finite() {
            return Err(ValidationError::InvalidValue {
                field: "price",
                reason: "must be a finite number",
            });
        }
        if price < 0.0 {
            return Err(ValidationError::InvalidValue {
                field: "price",
                reason: "must not be negative",
            });
        }

        let stock = self.stock.unwrap_or(0);
        if stock < 0 {
            return Err(ValidationError::InvalidValue {
                field: "stock",
                reason: "must not be negative",
            });
        }

        Ok(ProductDraft { name, price, stock })
    }
}

/// A validated field set, ready to be written to the Primary Store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub price: f64,
    pub stock: i64,
}
