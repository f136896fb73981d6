//! Authentication service - Issues and verifies JWT bearer tokens.
//!
//! Password verification goes through the domain Password value object;
//! credential lookup runs inside a unit of work like every other service
//! operation.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{Password, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;
use crate::with_transaction;

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Verify credentials and return a JWT token
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Generate JWT token for a user
fn generate_token(user: &User, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role.to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
    })
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    /// Create new auth service instance with Unit of Work
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let user_result = with_transaction!(self.uow, |ctx| {
            ctx.users().find_by_email(&email).await
        })?;

        // SECURITY: Perform password verification even if the user doesn't
        // exist to prevent timing attacks that could enumerate valid emails.
        let dummy_hash =
            "$argon2id$v=19$m=19456,t=2,p=1$dummysalt123456$dummyhash1234567890123456789012";

        let (password_hash, user_exists) = match &user_result {
            Some(user) => (user.password_hash.as_str(), true),
            None => (dummy_hash, false),
        };

        let stored_password = Password::from_hash(password_hash.to_string());
        let password_valid = stored_password.verify(&password);

        // Only succeed if both user exists AND password is valid
        if !user_exists || !password_valid {
            return Err(AppError::InvalidCredentials);
        }

        // Safe to index since we verified user_exists is true
        generate_token(user_result.as_ref().ok_or(AppError::InvalidCredentials)?, &self.config)
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;
    use crate::infra::RepoContext;

    /// Unit of work stand-in for tests that never touch the database
    struct NoopUnitOfWork;

    #[async_trait]
    impl UnitOfWork for NoopUnitOfWork {
        async fn run<F, T>(&self, _f: F) -> AppResult<T>
        where
            F: for<'c> FnOnce(
                    &'c (dyn RepoContext + 'c),
                ) -> std::pin::Pin<
                    Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'c>,
                > + Send,
            T: Send,
        {
            unreachable!("token tests never open a unit of work")
        }
    }

    fn sample_user() -> User {
        let now = Utc::now();
        User {
            id: 1,
            email: "user@example.com".to_string(),
            password_hash: "hash".to_string(),
            name: "Test User".to_string(),
            role: UserRole::User,
            created_at: now,
            updated_at: now,
        }
    }

    fn authenticator(secret: &str) -> Authenticator<NoopUnitOfWork> {
        Authenticator::new(Arc::new(NoopUnitOfWork), Config::with_secret(secret))
    }

    #[test]
    fn test_generated_token_round_trips() {
        let auth = authenticator("test-secret-key-minimum-32-chars!");
        let token = generate_token(&sample_user(), &auth.config).unwrap();

        assert_eq!(token.token_type, TOKEN_TYPE_BEARER);
        assert_eq!(token.expires_in, 24 * SECONDS_PER_HOUR);

        let claims = auth.verify_token(&token.access_token).unwrap();
        assert_eq!(claims.sub, 1);
        assert_eq!(claims.email, "user@example.com");
        assert_eq!(claims.role, "user");
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let issuer = authenticator("test-secret-key-minimum-32-chars!");
        let verifier = authenticator("another-secret-key-minimum-32-ch!");

        let token = generate_token(&sample_user(), &issuer.config).unwrap();

        let result = verifier.verify_token(&token.access_token);
        assert!(matches!(result.unwrap_err(), AppError::Jwt(_)));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let auth = authenticator("test-secret-key-minimum-32-chars!");

        assert!(auth.verify_token("not-a-jwt").is_err());
    }
}
