//! Product service tests built on mocked repositories.
//!
//! A stub unit of work hands the service a context backed by mockall
//! repository mocks, so each test can pin down the exact repository
//! calls an operation makes.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use catalog_api::domain::{Product, ProductData};
use catalog_api::errors::{AppError, AppResult};
use catalog_api::infra::{
    MockProductRepository, MockUserRepository, ProductRepository, RepoContext, UnitOfWork,
    UserRepository,
};
use catalog_api::services::{ProductCatalog, ProductService};

// =============================================================================
// Stub unit of work over mock repositories
// =============================================================================

struct StubContext {
    users: MockUserRepository,
    products: MockProductRepository,
}

impl RepoContext for StubContext {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn products(&self) -> &dyn ProductRepository {
        &self.products
    }
}

/// Unit of work that runs the closure directly against the mocks.
struct StubUnitOfWork {
    ctx: StubContext,
}

impl StubUnitOfWork {
    fn new(products: MockProductRepository) -> Self {
        Self {
            ctx: StubContext {
                users: MockUserRepository::new(),
                products,
            },
        }
    }
}

#[async_trait]
impl UnitOfWork for StubUnitOfWork {
    async fn run<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'c> FnOnce(
                &'c (dyn RepoContext + 'c),
            ) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'c>,
            > + Send,
        T: Send,
    {
        f(&self.ctx).await
    }
}

// =============================================================================
// Test helpers
// =============================================================================

fn sample_product(id: i64) -> Product {
    let now = Utc::now();
    Product {
        id,
        name: "Feather Wand".to_string(),
        maker: "Cat Toys Inc".to_string(),
        price: 5000,
        image_url: Some("https://example.com/wand.jpg".to_string()),
        created_at: now,
        updated_at: now,
    }
}

fn sample_data() -> ProductData {
    ProductData {
        name: "Feather Wand".to_string(),
        maker: "Cat Toys Inc".to_string(),
        price: 5000,
        image_url: Some("https://example.com/wand.jpg".to_string()),
    }
}

fn service_with(products: MockProductRepository) -> ProductCatalog<StubUnitOfWork> {
    ProductCatalog::new(Arc::new(StubUnitOfWork::new(products)))
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn get_products_returns_every_record() {
    let mut products = MockProductRepository::new();
    products
        .expect_list()
        .times(1)
        .returning(|| Ok(vec![sample_product(1), sample_product(2)]));

    let result = service_with(products).get_products().await.unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result[0].id, 1);
    assert_eq!(result[1].id, 2);
}

#[tokio::test]
async fn get_products_returns_empty_list_when_catalog_is_empty() {
    let mut products = MockProductRepository::new();
    products.expect_list().times(1).returning(|| Ok(vec![]));

    let result = service_with(products).get_products().await.unwrap();

    assert!(result.is_empty());
}

#[tokio::test]
async fn get_product_returns_existing_record() {
    let mut products = MockProductRepository::new();
    products
        .expect_find_by_id()
        .with(mockall::predicate::eq(1))
        .times(1)
        .returning(|id| Ok(Some(sample_product(id))));

    let product = service_with(products).get_product(1).await.unwrap();

    assert_eq!(product.id, 1);
    assert_eq!(product.name, "Feather Wand");
}

#[tokio::test]
async fn get_product_fails_with_not_found_for_unknown_id() {
    let mut products = MockProductRepository::new();
    products
        .expect_find_by_id()
        .with(mockall::predicate::eq(999))
        .times(1)
        .returning(|_| Ok(None));

    let result = service_with(products).get_product(999).await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}

#[tokio::test]
async fn create_product_persists_the_submitted_fields() {
    let mut products = MockProductRepository::new();
    products
        .expect_insert()
        .withf(|data: &ProductData| {
            data.name == "Feather Wand" && data.maker == "Cat Toys Inc" && data.price == 5000
        })
        .times(1)
        .returning(|data| {
            let now = Utc::now();
            Ok(Product {
                id: 1,
                name: data.name,
                maker: data.maker,
                price: data.price,
                image_url: data.image_url,
                created_at: now,
                updated_at: now,
            })
        });

    let product = service_with(products)
        .create_product(sample_data())
        .await
        .unwrap();

    assert_eq!(product.id, 1);
    assert_eq!(product.maker, "Cat Toys Inc");
}

#[tokio::test]
async fn update_product_overwrites_every_descriptive_field() {
    let mut products = MockProductRepository::new();
    products
        .expect_find_by_id()
        .with(mockall::predicate::eq(1))
        .times(1)
        .returning(|id| Ok(Some(sample_product(id))));
    products
        .expect_save()
        .withf(|p: &Product| {
            p.id == 1
                && p.name == "Laser Pointer"
                && p.maker == "Beam Co"
                && p.price == 12000
                && p.image_url.is_none()
        })
        .times(1)
        .returning(Ok);

    let data = ProductData {
        name: "Laser Pointer".to_string(),
        maker: "Beam Co".to_string(),
        price: 12000,
        image_url: None,
    };
    let product = service_with(products).update_product(1, data).await.unwrap();

    assert_eq!(product.name, "Laser Pointer");
    assert_eq!(product.price, 12000);
}

#[tokio::test]
async fn update_product_fails_with_not_found_before_saving() {
    let mut products = MockProductRepository::new();
    products
        .expect_find_by_id()
        .with(mockall::predicate::eq(999))
        .times(1)
        .returning(|_| Ok(None));
    products.expect_save().times(0);

    let result = service_with(products).update_product(999, sample_data()).await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}

#[tokio::test]
async fn delete_product_returns_the_removed_entity() {
    let mut products = MockProductRepository::new();
    products
        .expect_find_by_id()
        .with(mockall::predicate::eq(1))
        .times(1)
        .returning(|id| Ok(Some(sample_product(id))));
    products
        .expect_delete()
        .with(mockall::predicate::eq(1))
        .times(1)
        .returning(|_| Ok(()));

    let removed = service_with(products).delete_product(1).await.unwrap();

    assert_eq!(removed.id, 1);
    assert_eq!(removed.name, "Feather Wand");
}

#[tokio::test]
async fn delete_product_fails_with_not_found_without_deleting() {
    let mut products = MockProductRepository::new();
    products
        .expect_find_by_id()
        .with(mockall::predicate::eq(999))
        .times(1)
        .returning(|_| Ok(None));
    products.expect_delete().times(0);

    let result = service_with(products).delete_product(999).await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}
