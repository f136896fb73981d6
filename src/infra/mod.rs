//! Infrastructure layer - External systems integration
//!
//! This module handles the external system concerns:
//! - Database connections and repositories
//! - Unit of Work for transaction management

pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{ProductRepository, UserRepository};
pub use unit_of_work::{Persistence, RepoContext, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockProductRepository, MockUserRepository};
