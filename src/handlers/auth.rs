use axum::{extract::rejection::JsonRejection, response::IntoResponse, Json};
use chrono::Utc;

use crate::auth;
use crate::dtos::{AuthRequest, TokenResponse};
use crate::error::ApiError;

/// POST /api/v{1,2}/Authentication - issue a bearer token
///
/// Accepts any username/password pair and returns a short-lived token.
/// Credential validation against a user store belongs in front of the
/// `generate_token` call once such a store exists.
#[utoipa::path(
    post,
    path = "/api/v1/Authentication",
    tag = "Authentication",
    request_body = AuthRequest,
    responses(
        (status = 200, description = "Bearer token issued", body = TokenResponse),
        (status = 400, description = "Null or malformed user")
    )
)]
pub async fn authenticate(
    body: Result<Json<Option<AuthRequest>>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    // Malformed bodies are a client error, same as a null user
    let Json(user) = body?;
    let user = user.ok_or_else(|| ApiError::bad_request("Invalid User"))?;

    let token = auth::generate_token(user.user_name).map_err(|e| {
        tracing::error!("Token generation failed: {}", e);
        ApiError::internal_server_error("Failed to issue token")
    })?;

    Ok(Json(TokenResponse { token }))
}

/// GET /api/v2/Authentication - anonymous liveness probe
#[utoipa::path(
    get,
    path = "/api/v2/Authentication",
    tag = "Authentication",
    responses((status = 200, description = "API is listening"))
)]
pub async fn state() -> impl IntoResponse {
    format!("Catalog API is listening at {}", Utc::now())
}
