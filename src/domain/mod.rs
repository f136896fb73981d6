//! Domain layer - Core business entities and logic
//!
//! Contains the business models independent of infrastructure concerns:
//! entities, value objects, and the request/response projections built
//! from them with explicit per-field conversions.

pub mod password;
pub mod product;
pub mod user;

pub use password::Password;
pub use product::{Product, ProductData};
pub use user::{NewUser, User, UserRegistration, UserResponse, UserRole, UserUpdate};
