//! User service behavior tests.
//!
//! Run against an in-memory unit of work that emulates transactional
//! rollback by restoring a snapshot whenever an operation fails, so the
//! "no partial writes" properties are observable.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use catalog_api::domain::{
    NewUser, Password, Product, ProductData, User, UserRegistration, UserRole, UserUpdate,
};
use catalog_api::errors::{AppError, AppResult};
use catalog_api::infra::{ProductRepository, RepoContext, UnitOfWork, UserRepository};
use catalog_api::services::{UserManager, UserService};

// =============================================================================
// In-memory unit of work
// =============================================================================

#[derive(Default, Clone)]
struct StoreState {
    users: BTreeMap<i64, User>,
    products: BTreeMap<i64, Product>,
    next_user_id: i64,
    next_product_id: i64,
}

/// Repository context over an in-memory store
#[derive(Default)]
struct MemoryContext {
    state: Mutex<StoreState>,
}

impl RepoContext for MemoryContext {
    fn users(&self) -> &dyn UserRepository {
        self
    }

    fn products(&self) -> &dyn ProductRepository {
        self
    }
}

#[async_trait]
impl UserRepository for MemoryContext {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        Ok(self.state.lock().unwrap().users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    async fn insert(&self, new_user: NewUser) -> AppResult<User> {
        let mut state = self.state.lock().unwrap();
        state.next_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: state.next_user_id,
            email: new_user.email,
            password_hash: new_user.password_hash,
            name: new_user.name,
            role: new_user.role,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn save(&self, user: User) -> AppResult<User> {
        let mut state = self.state.lock().unwrap();
        if !state.users.contains_key(&user.id) {
            return Err(AppError::NotFound);
        }
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let mut state = self.state.lock().unwrap();
        state.users.remove(&id).map(|_| ()).ok_or(AppError::NotFound)
    }
}

#[async_trait]
impl ProductRepository for MemoryContext {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Product>> {
        Ok(self.state.lock().unwrap().products.get(&id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Product>> {
        Ok(self.state.lock().unwrap().products.values().cloned().collect())
    }

    async fn insert(&self, data: ProductData) -> AppResult<Product> {
        let mut state = self.state.lock().unwrap();
        state.next_product_id += 1;
        let now = Utc::now();
        let product = Product {
            id: state.next_product_id,
            name: data.name,
            maker: data.maker,
            price: data.price,
            image_url: data.image_url,
            created_at: now,
            updated_at: now,
        };
        state.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn save(&self, product: Product) -> AppResult<Product> {
        let mut state = self.state.lock().unwrap();
        if !state.products.contains_key(&product.id) {
            return Err(AppError::NotFound);
        }
        state.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let mut state = self.state.lock().unwrap();
        state
            .products
            .remove(&id)
            .map(|_| ())
            .ok_or(AppError::NotFound)
    }
}

/// Unit of work over the in-memory context.
///
/// Rollback semantics: the store is snapshotted before the closure runs
/// and restored if the closure fails.
#[derive(Default)]
struct MemoryUnitOfWork {
    ctx: MemoryContext,
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn run<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'c> FnOnce(
                &'c (dyn RepoContext + 'c),
            ) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'c>,
            > + Send,
        T: Send,
    {
        let snapshot = self.ctx.state.lock().unwrap().clone();
        let result = f(&self.ctx).await;
        if result.is_err() {
            *self.ctx.state.lock().unwrap() = snapshot;
        }
        result
    }
}

// =============================================================================
// Test helpers
// =============================================================================

fn registration(email: &str, name: &str) -> UserRegistration {
    UserRegistration {
        email: email.to_string(),
        password: "ValidPass123".to_string(),
        name: name.to_string(),
    }
}

fn setup() -> (Arc<MemoryUnitOfWork>, UserManager<MemoryUnitOfWork>) {
    let uow = Arc::new(MemoryUnitOfWork::default());
    let service = UserManager::new(uow.clone());
    (uow, service)
}

fn user_count(uow: &MemoryUnitOfWork) -> usize {
    uow.ctx.state.lock().unwrap().users.len()
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn get_user_returns_existing_record() {
    let (_uow, service) = setup();
    let created = service
        .create_user(registration("test@example.com", "Test User"))
        .await
        .unwrap();

    let found = service.get_user(created.id).await.unwrap();

    assert_eq!(found.id, created.id);
    assert_eq!(found.email, "test@example.com");
    assert_eq!(found.name, "Test User");
}

#[tokio::test]
async fn get_user_fails_with_not_found_for_unknown_id() {
    let (_uow, service) = setup();

    let result = service.get_user(42).await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}

#[tokio::test]
async fn create_user_assigns_default_role() {
    let (_uow, service) = setup();

    let user = service
        .create_user(registration("test@example.com", "Test User"))
        .await
        .unwrap();

    assert_eq!(user.role, UserRole::User);
}

#[tokio::test]
async fn create_user_never_stores_plaintext_password() {
    let (_uow, service) = setup();

    let user = service
        .create_user(registration("test@example.com", "Test User"))
        .await
        .unwrap();

    assert_ne!(user.password_hash, "ValidPass123");
    assert!(Password::from_hash(user.password_hash).verify("ValidPass123"));
}

#[tokio::test]
async fn create_user_with_taken_email_fails_and_writes_nothing() {
    let (uow, service) = setup();
    service
        .create_user(registration("taken@example.com", "First"))
        .await
        .unwrap();

    let result = service
        .create_user(registration("taken@example.com", "Second"))
        .await;

    assert!(matches!(result.unwrap_err(), AppError::EmailTaken(_)));
    assert_eq!(user_count(&uow), 1);
}

#[tokio::test]
async fn update_user_overwrites_name_and_rehashes_password() {
    let (_uow, service) = setup();
    let created = service
        .create_user(registration("test@example.com", "Before"))
        .await
        .unwrap();
    let old_hash = created.password_hash.clone();

    let updated = service
        .update_user(
            created.id,
            UserUpdate {
                name: "After".to_string(),
                password: "NewPassword456".to_string(),
            },
            created.id,
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "After");
    // Email is not an updatable field
    assert_eq!(updated.email, "test@example.com");
    assert_ne!(updated.password_hash, old_hash);
    assert!(Password::from_hash(updated.password_hash).verify("NewPassword456"));
}

#[tokio::test]
async fn update_user_fails_with_not_found_and_writes_nothing() {
    let (uow, service) = setup();

    let result = service
        .update_user(
            99,
            UserUpdate {
                name: "Ghost".to_string(),
                password: "SomePassword1".to_string(),
            },
            1,
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
    assert_eq!(user_count(&uow), 0);
}

#[tokio::test]
async fn failed_update_rolls_back_the_whole_operation() {
    let (_uow, service) = setup();
    let created = service
        .create_user(registration("test@example.com", "Before"))
        .await
        .unwrap();

    // Password below the minimum length makes the operation fail after the
    // user was loaded; nothing may be persisted
    let result = service
        .update_user(
            created.id,
            UserUpdate {
                name: "After".to_string(),
                password: "short".to_string(),
            },
            created.id,
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));

    let reloaded = service.get_user(created.id).await.unwrap();
    assert_eq!(reloaded.name, "Before");
    assert_eq!(reloaded.password_hash, created.password_hash);
}

#[tokio::test]
async fn delete_user_removes_the_record() {
    let (uow, service) = setup();
    let created = service
        .create_user(registration("test@example.com", "Test User"))
        .await
        .unwrap();

    let removed = service.delete_user(created.id).await.unwrap();
    assert_eq!(removed.id, created.id);
    assert_eq!(user_count(&uow), 0);

    let result = service.get_user(created.id).await;
    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}

#[tokio::test]
async fn delete_user_fails_with_not_found_for_unknown_id() {
    let (_uow, service) = setup();

    let result = service.delete_user(7).await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}
