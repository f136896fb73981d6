//! Session handlers - credential exchange for JWT tokens.

use axum::{extract::State, http::StatusCode, response::Json, routing::post, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::services::TokenResponse;

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// User email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    /// User password
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

/// Create session routes
pub fn session_routes() -> Router<AppState> {
    Router::new().route("/", post(login))
}

/// Exchange credentials for a JWT token
#[utoipa::path(
    post,
    path = "/session",
    tag = "Session",
    request_body = LoginRequest,
    responses(
        (status = 201, description = "Session created", body = TokenResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<(StatusCode, Json<TokenResponse>)> {
    let token = state
        .auth_service
        .login(payload.email, payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(token)))
}
