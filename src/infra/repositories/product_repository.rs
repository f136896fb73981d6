//! Product repository trait.

use async_trait::async_trait;

use crate::domain::{Product, ProductData};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Product persistence operations.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Find product by ID
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Product>>;

    /// List all products
    async fn list(&self) -> AppResult<Vec<Product>>;

    /// Persist a new product and return it with its generated id
    async fn insert(&self, data: ProductData) -> AppResult<Product>;

    /// Write back a loaded product's mutable fields
    async fn save(&self, product: Product) -> AppResult<Product>;

    /// Remove a product by ID
    async fn delete(&self, id: i64) -> AppResult<()>;
}
