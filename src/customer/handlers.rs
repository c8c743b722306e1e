//! REST handler for the checkout contact form

use super::models::CustomerPatch;
use crate::cart::handlers::with_session;
use crate::state::SharedState;
use axum::{extract::State, http::HeaderMap, response::Response, routing::patch, Json, Router};

pub fn routes() -> Router<SharedState> {
    Router::new().route("/customer", patch(update_customer))
}

/// Endpoint: PATCH /customer
/// Replaces only the fields present in the body.
async fn update_customer(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(payload): Json<CustomerPatch>,
) -> Response {
    with_session(&state, &headers, |session, _| {
        session.customer_mut()?.apply(payload);
        Ok(None)
    })
}
