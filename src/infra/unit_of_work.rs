//! Unit of Work pattern implementation.
//!
//! Transactional demarcation is an explicit value: each service operation
//! opens one unit of work, performs its reads and writes through the
//! repositories bound to that transaction, and the whole scope commits on
//! success or rolls back on any error. Partial writes are never observable.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    AccessMode, ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection,
    DatabaseTransaction, EntityTrait, IsolationLevel, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use super::repositories::entities::{product, user};
use super::repositories::{ProductRepository, UserRepository};
use crate::domain::{NewUser, Product, ProductData, User};
use crate::errors::{AppError, AppResult};

/// Repository access within one open unit of work.
///
/// Everything obtained through this context runs on the same database
/// transaction.
pub trait RepoContext: Send + Sync {
    /// User repository bound to this unit of work
    fn users(&self) -> &dyn UserRepository;

    /// Product repository bound to this unit of work
    fn products(&self) -> &dyn ProductRepository;
}

/// Unit of Work trait for dependency injection.
///
/// Note: the generic `run` method makes this trait non-mockable directly.
/// Tests substitute whole `UnitOfWork` implementations instead.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Execute a closure within a transaction.
    ///
    /// The transaction is committed when the closure returns `Ok` and rolled
    /// back when it returns `Err`.
    async fn run<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'c> FnOnce(
                &'c (dyn RepoContext + 'c),
            ) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'c>,
            > + Send,
        T: Send;
}

/// Concrete implementation of UnitOfWork over a SeaORM connection
pub struct Persistence {
    db: Arc<DatabaseConnection>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    async fn run<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'c> FnOnce(
                &'c (dyn RepoContext + 'c),
            ) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'c>,
            > + Send,
        T: Send,
    {
        // ReadCommitted gives balanced consistency/performance for
        // single-aggregate operations
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            )
            .await
            .map_err(AppError::from)?;

        // The context borrows the transaction; scope it so the borrow ends
        // before commit/rollback take ownership
        let result = {
            let ctx = TxRepoContext::new(&txn);
            f(&ctx).await
        };

        match result {
            Ok(value) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Repository context over a live database transaction
struct TxRepoContext<'a> {
    users: TxUserStore<'a>,
    products: TxProductStore<'a>,
}

impl<'a> TxRepoContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self {
            users: TxUserStore { txn },
            products: TxProductStore { txn },
        }
    }
}

impl RepoContext for TxRepoContext<'_> {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn products(&self) -> &dyn ProductRepository {
        &self.products
    }
}

/// Transaction-bound user repository
struct TxUserStore<'a> {
    txn: &'a DatabaseTransaction,
}

#[async_trait]
impl UserRepository for TxUserStore<'_> {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let result = user::Entity::find_by_id(id)
            .one(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    async fn insert(&self, new_user: NewUser) -> AppResult<User> {
        let now = chrono::Utc::now();
        let active_model = user::ActiveModel {
            id: NotSet,
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            name: Set(new_user.name),
            role: Set(new_user.role.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model
            .insert(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(User::from(model))
    }

    async fn save(&self, user: User) -> AppResult<User> {
        let active_model = user::ActiveModel {
            id: Set(user.id),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            name: Set(user.name),
            role: Set(user.role.to_string()),
            created_at: NotSet,
            updated_at: Set(chrono::Utc::now()),
        };

        let model = active_model
            .update(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(User::from(model))
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let result = user::Entity::delete_by_id(id)
            .exec(self.txn)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}

/// Transaction-bound product repository
struct TxProductStore<'a> {
    txn: &'a DatabaseTransaction,
}

#[async_trait]
impl ProductRepository for TxProductStore<'_> {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Product>> {
        let result = product::Entity::find_by_id(id)
            .one(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Product::from))
    }

    async fn list(&self) -> AppResult<Vec<Product>> {
        let models = product::Entity::find()
            .order_by_asc(product::Column::Id)
            .all(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Product::from).collect())
    }

    async fn insert(&self, data: ProductData) -> AppResult<Product> {
        let now = chrono::Utc::now();
        let active_model = product::ActiveModel {
            id: NotSet,
            name: Set(data.name),
            maker: Set(data.maker),
            price: Set(data.price),
            image_url: Set(data.image_url),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model
            .insert(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(Product::from(model))
    }

    async fn save(&self, product: Product) -> AppResult<Product> {
        let active_model = product::ActiveModel {
            id: Set(product.id),
            name: Set(product.name),
            maker: Set(product.maker),
            price: Set(product.price),
            image_url: Set(product.image_url),
            created_at: NotSet,
            updated_at: Set(chrono::Utc::now()),
        };

        let model = active_model
            .update(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(Product::from(model))
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let result = product::Entity::delete_by_id(id)
            .exec(self.txn)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}

/// Shorthand for running a service operation inside one unit of work.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.run(|$ctx| Box::pin(async move { $body })).await
    };
}
