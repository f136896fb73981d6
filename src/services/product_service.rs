//! Product service - Handles product catalog business logic.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{Product, ProductData};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;
use crate::with_transaction;

/// Product service trait for dependency injection.
#[async_trait]
pub trait ProductService: Send + Sync {
    /// List all products
    async fn get_products(&self) -> AppResult<Vec<Product>>;

    /// Get product by ID; fails with NotFound if absent
    async fn get_product(&self, id: i64) -> AppResult<Product>;

    /// Register a new product
    async fn create_product(&self, data: ProductData) -> AppResult<Product>;

    /// Overwrite a product's descriptive fields
    async fn update_product(&self, id: i64, data: ProductData) -> AppResult<Product>;

    /// Remove a product and return the removed entity
    async fn delete_product(&self, id: i64) -> AppResult<Product>;
}

/// Concrete implementation of ProductService using Unit of Work.
pub struct ProductCatalog<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ProductCatalog<U> {
    /// Create new product service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> ProductService for ProductCatalog<U> {
    async fn get_products(&self) -> AppResult<Vec<Product>> {
        with_transaction!(self.uow, |ctx| { ctx.products().list().await })
    }

    async fn get_product(&self, id: i64) -> AppResult<Product> {
        with_transaction!(self.uow, |ctx| {
            ctx.products()
                .find_by_id(id)
                .await?
                .ok_or(AppError::NotFound)
        })
    }

    async fn create_product(&self, data: ProductData) -> AppResult<Product> {
        with_transaction!(self.uow, |ctx| { ctx.products().insert(data).await })
    }

    async fn update_product(&self, id: i64, data: ProductData) -> AppResult<Product> {
        with_transaction!(self.uow, |ctx| {
            let mut product = ctx
                .products()
                .find_by_id(id)
                .await?
                .ok_or(AppError::NotFound)?;

            product.apply_data(&data);

            ctx.products().save(product).await
        })
    }

    async fn delete_product(&self, id: i64) -> AppResult<Product> {
        with_transaction!(self.uow, |ctx| {
            let product = ctx
                .products()
                .find_by_id(id)
                .await?
                .ok_or(AppError::NotFound)?;

            ctx.products().delete(product.id).await?;

            Ok(product)
        })
    }
}
