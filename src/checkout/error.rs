//! Checkout errors

use super::delivery::DeliveryError;
use crate::customer::CustomerField;
use thiserror::Error;

/// Why a checkout attempt did not go through
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// A previous submission for this session has not settled yet
    #[error("a submission is already in progress")]
    SubmissionInProgress,

    #[error("cart is empty")]
    EmptyCart,

    #[error("missing contact information: {}", field_list(.0))]
    MissingContactInfo(Vec<CustomerField>),

    /// The endpoint answered with a non-success status
    #[error("delivery endpoint rejected the order with status {status}")]
    DeliveryRejected { status: u16 },

    /// The request never completed (connection failure, timeout)
    #[error("could not reach delivery endpoint: {0}")]
    Transport(String),
}

impl CheckoutError {
    /// True for failures detected before any network I/O
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            CheckoutError::EmptyCart | CheckoutError::MissingContactInfo(_)
        )
    }

    /// True when the outbound call was made and failed
    pub fn is_delivery_failure(&self) -> bool {
        matches!(
            self,
            CheckoutError::DeliveryRejected { .. } | CheckoutError::Transport(_)
        )
    }
}

impl From<DeliveryError> for CheckoutError {
    fn from(err: DeliveryError) -> Self {
        match err {
            DeliveryError::Rejected(status) => CheckoutError::DeliveryRejected { status },
            DeliveryError::Transport(msg) => CheckoutError::Transport(msg),
        }
    }
}

pub(crate) fn field_list(fields: &[CustomerField]) -> String {
    fields
        .iter()
        .map(CustomerField::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
