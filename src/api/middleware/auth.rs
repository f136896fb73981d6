//! JWT authentication middleware.
//!
//! The middleware stage resolves the principal before any guarded handler
//! runs. A request without the Authorization header is answered with a bare
//! 401 and an empty body; a present-but-invalid token gets the standard
//! error envelope.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::{BEARER_TOKEN_PREFIX, ROLE_ADMIN};
use crate::errors::AppError;

/// Authenticated principal extracted from the JWT token
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: i64,
    pub email: String,
    pub role: String,
}

impl CurrentUser {
    /// Check if the principal has admin privileges.
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

/// JWT authentication middleware.
///
/// Extracts and validates the token from the Authorization header, then
/// injects the CurrentUser into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Absent header is the locally-suppressed case: 401, empty body
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::MissingAuthHeader)?;

    let token = auth_header
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .ok_or(AppError::Unauthorized)?;

    let claims = state.auth_service.verify_token(token)?;

    let current_user = CurrentUser {
        id: claims.sub,
        email: claims.email,
        role: claims.role,
    };

    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}

/// Require a role, returning Forbidden if the principal lacks it.
/// Admin satisfies every role requirement.
pub fn require_role(user: &CurrentUser, required_role: &str) -> Result<(), AppError> {
    if user.role == required_role || user.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}
