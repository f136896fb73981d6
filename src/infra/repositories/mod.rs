//! Repository layer - Data access abstraction
//!
//! Repository traits describe the persistence operations each aggregate
//! needs. The implementations bound to a live transaction are in
//! `infra::unit_of_work`; mocks are generated for tests.

pub(crate) mod entities;
mod product_repository;
mod user_repository;

pub use product_repository::ProductRepository;
pub use user_repository::UserRepository;

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use product_repository::MockProductRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
