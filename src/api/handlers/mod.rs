//! HTTP request handlers.

pub mod product_handler;
pub mod session_handler;
pub mod user_handler;

pub use product_handler::product_routes;
pub use session_handler::session_routes;
pub use user_handler::user_routes;
