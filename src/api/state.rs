//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::infra::Database;
use crate::services::{AuthService, ProductService, Services, UserService};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// User service
    pub user_service: Arc<dyn UserService>,
    /// Product service
    pub product_service: Arc<dyn ProductService>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state from a database connection and config.
    pub fn from_config(database: Arc<Database>, config: crate::config::Config) -> Self {
        let services = Services::from_connection(database.get_connection(), config);

        Self {
            auth_service: services.auth(),
            user_service: services.users(),
            product_service: services.products(),
            database,
        }
    }

    /// Create application state with manually injected services (tests).
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        product_service: Arc<dyn ProductService>,
        database: Arc<Database>,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            product_service,
            database,
        }
    }
}
