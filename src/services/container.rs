//! Service container - wires the persistence layer into the services.

use std::sync::Arc;

use super::{AuthService, Authenticator, ProductCatalog, ProductService, UserManager, UserService};
use crate::config::Config;
use crate::infra::Persistence;

/// Holds one shared instance of each application service.
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    product_service: Arc<dyn ProductService>,
}

impl Services {
    /// Build all services over a shared SeaORM connection
    pub fn from_connection(db: Arc<sea_orm::DatabaseConnection>, config: Config) -> Self {
        let uow = Arc::new(Persistence::new(db));
        let auth_service = Arc::new(Authenticator::new(uow.clone(), config));
        let user_service = Arc::new(UserManager::new(uow.clone()));
        let product_service = Arc::new(ProductCatalog::new(uow));

        Self {
            auth_service,
            user_service,
            product_service,
        }
    }

    /// Get authentication service
    pub fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    /// Get user service
    pub fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    /// Get product service
    pub fn products(&self) -> Arc<dyn ProductService> {
        self.product_service.clone()
    }
}
