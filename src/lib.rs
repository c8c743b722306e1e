//! Landing Page Checkout Library
//!
//! Backend for the product landing pages: the catalog, per-shopper cart and
//! contact form, the checkout submission flow, and the tenant organization
//! registry.

// Domain modules
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod customer;
pub mod money;
pub mod notify;
pub mod organizations;

// Infrastructure
pub mod config;
pub mod error;
pub mod router;
pub mod state;
