//! Product Catalog Module
//!
//! Static, read-only list of the hardware, software and services offered on
//! the landing page, plus the `GET /catalog` route.

pub mod handlers;
pub mod models;

pub use handlers::routes;
pub use models::{catalog, find_item, CatalogItem};
