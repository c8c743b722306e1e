//! HTTP error mapping
//!
//! Domain errors are converted into `ApiError`, which renders as
//! `{"error": "<message>"}` with a matching status code.

use crate::checkout::CheckoutError;
use crate::organizations::OrganizationError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    /// Well-formed request the current state cannot satisfy
    #[error("{0}")]
    Unprocessable(String),

    /// An upstream service failed
    #[error("{0}")]
    BadGateway(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        if err.is_rejection() {
            ApiError::Unprocessable(err.to_string())
        } else if err.is_delivery_failure() {
            ApiError::BadGateway(err.to_string())
        } else {
            ApiError::Conflict(
                "Checkout in progress; the cart is locked until it completes".into(),
            )
        }
    }
}

impl From<OrganizationError> for ApiError {
    fn from(err: OrganizationError) -> Self {
        match err {
            OrganizationError::NotFound(_) => ApiError::NotFound(err.to_string()),
            OrganizationError::Forbidden(_) => ApiError::Forbidden(err.to_string()),
            OrganizationError::InvalidName => ApiError::BadRequest(err.to_string()),
        }
    }
}
