//! User service - Handles user-related business logic.
//!
//! Orchestrates domain operations via the Unit of Work: every method runs
//! inside one transaction, so a failure mid-operation leaves no partial
//! writes behind.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{NewUser, Password, User, UserRegistration, UserUpdate};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;
use crate::with_transaction;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Get user by ID; fails with NotFound if absent
    async fn get_user(&self, id: i64) -> AppResult<User>;

    /// Register a new user; fails with EmailTaken if the email is in use
    async fn create_user(&self, request: UserRegistration) -> AppResult<User>;

    /// Overwrite a user's non-password fields and re-hash its password.
    ///
    /// `acting_user_id` identifies the principal performing the update. It is
    /// not used for ownership enforcement yet; the parameter exists so the
    /// check can be added without an interface change.
    async fn update_user(
        &self,
        id: i64,
        request: UserUpdate,
        acting_user_id: i64,
    ) -> AppResult<User>;

    /// Remove a user and return the removed entity
    async fn delete_user(&self, id: i64) -> AppResult<User>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    /// Create new user service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn get_user(&self, id: i64) -> AppResult<User> {
        with_transaction!(self.uow, |ctx| {
            ctx.users().find_by_id(id).await?.ok_or(AppError::NotFound)
        })
    }

    async fn create_user(&self, request: UserRegistration) -> AppResult<User> {
        with_transaction!(self.uow, |ctx| {
            // Uniqueness is checked before any write
            if ctx.users().exists_by_email(&request.email).await? {
                return Err(AppError::email_taken(request.email));
            }

            let password_hash = Password::new(&request.password)?.into_string();
            let new_user = NewUser::new(request.email, password_hash, request.name);

            ctx.users().insert(new_user).await
        })
    }

    async fn update_user(
        &self,
        id: i64,
        request: UserUpdate,
        _acting_user_id: i64,
    ) -> AppResult<User> {
        with_transaction!(self.uow, |ctx| {
            let mut user = ctx.users().find_by_id(id).await?.ok_or(AppError::NotFound)?;

            user.apply_update(&request);
            user.set_password(Password::new(&request.password)?);

            ctx.users().save(user).await
        })
    }

    async fn delete_user(&self, id: i64) -> AppResult<User> {
        with_transaction!(self.uow, |ctx| {
            let user = ctx.users().find_by_id(id).await?.ok_or(AppError::NotFound)?;

            ctx.users().delete(user.id).await?;

            Ok(user)
        })
    }
}
