//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::{ROLE_ADMIN, ROLE_USER};
use crate::domain::Password;

/// User roles enumeration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Check if this role satisfies a required role
    pub fn can_access(&self, required: &UserRole) -> bool {
        match self {
            UserRole::Admin => true,
            UserRole::User => matches!(required, UserRole::User),
        }
    }
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s {
            ROLE_ADMIN => UserRole::Admin,
            _ => UserRole::User,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "{}", ROLE_ADMIN),
            UserRole::User => write!(f, "{}", ROLE_USER),
        }
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Overwrite the non-password fields from an update request.
    ///
    /// Explicit per-field assignment; the email is identity-adjacent and
    /// stays untouched by updates.
    pub fn apply_update(&mut self, update: &UserUpdate) {
        self.name = update.name.clone();
        self.updated_at = Utc::now();
    }

    /// Replace the stored password hash.
    pub fn set_password(&mut self, password: Password) {
        self.password_hash = password.into_string();
        self.updated_at = Utc::now();
    }
}

/// Fields needed to persist a brand-new user.
///
/// Built field by field from a create request once the password has been
/// hashed; never carries the plaintext password.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: UserRole,
}

impl NewUser {
    /// Assemble a new user record with the default role.
    pub fn new(email: String, password_hash: String, name: String) -> Self {
        Self {
            email,
            password_hash,
            name,
            role: UserRole::User,
        }
    }
}

/// User creation data as accepted by the service (plaintext password;
/// hashing happens inside the create operation)
#[derive(Debug, Clone)]
pub struct UserRegistration {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// User update data (non-password fields plus a replacement password)
#[derive(Debug, Clone)]
pub struct UserUpdate {
    /// New display name
    pub name: String,
    /// Replacement password (re-hashed on every update)
    pub password: String,
}

/// User response projection (safe to return to clients)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    /// Unique user identifier
    #[schema(example = 1)]
    pub id: i64,
    /// User email address
    #[schema(example = "user@example.com")]
    pub email: String,
    /// User display name
    #[schema(example = "John Doe")]
    pub name: String,
    /// User role
    #[schema(example = "user")]
    pub role: String,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role.to_string(),
            created_at: user.created_at,
        }
    }
}
