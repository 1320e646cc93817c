use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use catalog::auth::AuthError;
use shared::Error;
use shared_http::api::ErrorResponse;
use tracing::error;

/// Everything a product-service handler or middleware can fail with
#[derive(Debug)]
pub enum ApiError {
    Auth(AuthError),
    Resource(Error),
    BadRequest(String),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Auth(err)
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError::Resource(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Auth(err) if err.is_rejection() => (
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, "Bearer")],
                Json(ErrorResponse::new(err.to_string())),
            )
                .into_response(),
            ApiError::Auth(err) => {
                error!(error = ?err, "authentication backend failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new("Internal error")),
                )
                    .into_response()
            }
            ApiError::Resource(Error::NotFound) => {
                (StatusCode::NOT_FOUND, Json(ErrorResponse::new("Not found"))).into_response()
            }
            ApiError::Resource(Error::Validation(err)) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("Validation failed").with_details(err.to_string())),
            )
                .into_response(),
            ApiError::Resource(Error::Store(err)) => {
                error!(error = ?err, backend = err.backend(), "store unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(ErrorResponse::new("Store unavailable").with_details(err.backend())),
                )
                    .into_response()
            }
            ApiError::BadRequest(details) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("Invalid request body").with_details(details)),
            )
                .into_response(),
        }
    }
}
