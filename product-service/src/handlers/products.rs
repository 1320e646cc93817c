use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use catalog::ProductId;
use catalog::auth::Subject;
use shared_http::api::{CreatedResponse, MessageResponse, ProductRequest, ProductResponse};
use tracing::info;

fn body(payload: Result<Json<ProductRequest>, JsonRejection>) -> Result<ProductRequest, ApiError> {
    payload
        .map(|Json(req)| req)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// GET /products
pub async fn list_products(
    State(state): State<AppState>,
    Extension(subject): Extension<Subject>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let products = state.products.list().await?;
    info!(%subject, count = products.len(), "listed products");

    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

/// POST /products
pub async fn create_product(
    State(state): State<AppState>,
    Extension(subject): Extension<Subject>,
    payload: Result<Json<ProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let req = body(payload)?;
    let id = state.products.create(req.into()).await?;
    info!(%subject, product_id = id, "created product");

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Product created".to_string(),
            id,
        }),
    ))
}

/// GET /products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = state.products.get(id).await?;
    Ok(Json(product.into()))
}

/// PUT /products/{id}
pub async fn update_product(
    State(state): State<AppState>,
    Extension(subject): Extension<Subject>,
    Path(id): Path<ProductId>,
    payload: Result<Json<ProductRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let req = body(payload)?;
    state.products.update(id, req.into()).await?;
    info!(%subject, product_id = id, "updated product");

    Ok(Json(MessageResponse::new("Product updated")))
}

/// DELETE /products/{id}
pub async fn delete_product(
    State(state): State<AppState>,
    Extension(subject): Extension<Subject>,
    Path(id): Path<ProductId>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.products.delete(id).await?;
    info!(%subject, product_id = id, "deleted product");

    Ok(Json(MessageResponse::new("Product deleted")))
}
