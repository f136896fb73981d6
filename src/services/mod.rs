//! Services layer - Application use cases and business logic
//!
//! Services orchestrate domain operations through the Unit of Work:
//! each service method is one transactional scope.

mod auth_service;
mod container;
mod product_service;
mod user_service;

pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use container::Services;
pub use product_service::{ProductCatalog, ProductService};
pub use user_service::{UserManager, UserService};
