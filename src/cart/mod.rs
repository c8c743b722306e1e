//! Shopping Cart Domain Module
//!
//! This module contains all shopping cart logic, including:
//! - Domain models (CartLine, request bodies)
//! - The cart store (add, remove, set quantity, totals)
//! - Session cookie and formatting helpers
//! - REST API handlers

pub mod handlers;
pub mod helpers;
pub mod models;
pub mod store;

// Re-export commonly used types for convenience
pub use handlers::routes;
pub use models::CartLine;
pub use store::Cart;
