use catalog::ProductFields;
use serde::Deserialize;

/// Request body for the login endpoint
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request body for creating or replacing a product.
/// Every field is optional here; presence is checked by the store.
#[derive(Debug, Default, Deserialize)]
pub struct ProductRequest {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
}

impl From<ProductRequest> for ProductFields {
    fn from(req: ProductRequest) -> Self {
        ProductFields {
            name: req.name,
            price: req.price,
            stock: req.stock,
        }
    }
}
