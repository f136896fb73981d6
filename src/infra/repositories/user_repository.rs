//! User repository trait.

use async_trait::async_trait;

use crate::domain::{NewUser, User};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User persistence operations.
///
/// All methods run against the unit of work's transaction; nothing is
/// visible outside the transaction until it commits.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;

    /// Find user by email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Check whether a user with this email exists
    async fn exists_by_email(&self, email: &str) -> AppResult<bool>;

    /// Persist a new user and return it with its generated id
    async fn insert(&self, new_user: NewUser) -> AppResult<User>;

    /// Write back a loaded user's mutable fields
    async fn save(&self, user: User) -> AppResult<User>;

    /// Remove a user by ID
    async fn delete(&self, id: i64) -> AppResult<()>;
}
