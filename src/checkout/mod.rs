//! Checkout Domain Module
//!
//! This module contains the checkout submission flow, including:
//! - The per-shopper session (cart, contact form, submit phase)
//! - The submission payload and delivery envelope
//! - The outbound delivery client
//! - The submitter that validates, sends and notifies
//! - The `POST /checkout` handler

pub mod delivery;
pub mod error;
pub mod handlers;
pub mod models;
pub mod session;
pub mod submitter;

pub use delivery::{DeliveryClient, DeliveryError, HttpDeliveryClient};
pub use error::CheckoutError;
pub use handlers::routes;
pub use models::{DeliveryEnvelope, SubmitReceipt, Submission};
pub use session::{CheckoutSession, SessionHandle, SessionSnapshot, SubmitPhase};
pub use submitter::CheckoutSubmitter;
