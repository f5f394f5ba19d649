pub mod auth;
pub mod common;
pub mod warehouses;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;
