//! Customer Info Form Module
//!
//! Contact and delivery fields entered by the shopper, and the
//! `PATCH /customer` route that updates them.

pub mod handlers;
pub mod models;

pub use handlers::routes;
pub use models::{CustomerField, CustomerInfo, CustomerPatch};
