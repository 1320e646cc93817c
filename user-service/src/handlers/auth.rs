use crate::state::AppState;
use axum::{
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use shared_http::api::{ErrorResponse, LoginRequest, LoginResponse};
use tracing::{error, info};

/// POST /login
///
/// Exchange a username and password for a signed token.
///
/// Body: `{"username": "testuser", "password": "password123"}`
///
/// The token is valid for the configured window and is accepted by every
/// service configured with the same shared secret.
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, (StatusCode, Json<ErrorResponse>)> {
    let Json(req) = body.map_err(|rejection| {
        (
            StatusCode::BAD_REQUEST,
            Json(
                ErrorResponse::new("Missing credentials. Provide username and password")
                    .with_details(rejection.body_text()),
            ),
        )
    })?;

    info!(subject = %req.username, "login requested");

    match state.token_service.issue(&req.username, &req.password).await {
        Ok(signed) => Ok(Json(LoginResponse {
            token: signed.token,
            expires_in: signed.expires_in_secs,
            expires_at: signed.expires_at,
        })),
        Err(e) if e.is_rejection() => Err((
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("Invalid credentials")),
        )),
        Err(e) => {
            error!(error = ?e, "failed to issue token");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to issue token")),
            ))
        }
    }
}
