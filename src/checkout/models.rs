//! Checkout Domain Models

use crate::cart::models::CartLine;
use crate::customer::CustomerInfo;
use crate::money::Money;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// The order request built at submit time. Never stored; its only
/// destination is the delivery endpoint.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Submission {
    pub customer: CustomerInfo,
    pub items: Vec<CartLine>,
    pub total: Money,
    /// ISO-8601 UTC, millisecond precision
    pub timestamp: String,
}

impl Submission {
    pub fn new(
        customer: CustomerInfo,
        items: Vec<CartLine>,
        total: Money,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            customer,
            items,
            total,
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Body of the outbound delivery request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryEnvelope<'a> {
    pub to: &'a str,
    pub subject: &'a str,
    pub cart_data: &'a Submission,
}

/// Returned by a successful submit
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReceipt {
    pub submission: Submission,
    /// Tells the page to close the checkout view
    pub close_checkout: bool,
}
