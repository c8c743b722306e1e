//! REST API handlers for shopping cart operations
//!
//! Each handler resolves the shopper's session from the `cart_session`
//! cookie, applies one cart operation and returns the updated session.

use super::helpers::{resolve_session_id, with_session_cookie};
use super::models::{AddItemInput, SetQuantityInput};
use crate::catalog::find_item;
use crate::checkout::session::SessionSnapshot;
use crate::checkout::CheckoutSession;
use crate::error::ApiError;
use crate::notify::{Notification, NotificationSink, TracingSink};
use crate::state::SharedState;
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::Serialize;

/// Creates routes for cart-related operations
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/cart", get(get_cart).delete(clear_cart))
        .route("/cart/items", axum::routing::post(add_item))
        .route("/cart/items/:id", put(set_quantity).delete(remove_item))
}

/// Session state plus the notification produced by the request, if any
#[derive(Serialize)]
pub struct CartResponse {
    #[serde(flatten)]
    pub session: SessionSnapshot,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<Notification>,
}

/// Endpoint: GET /cart
async fn get_cart(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    with_session(&state, &headers, |_, _| Ok(None))
}

/// Endpoint: POST /cart/items
async fn add_item(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(payload): Json<AddItemInput>,
) -> Response {
    with_session(&state, &headers, |session, session_id| {
        let item = find_item(&payload.id)
            .ok_or_else(|| ApiError::NotFound(format!("Unknown catalog item: {}", payload.id)))?;

        let quantity = session.cart_mut()?.add_item(item).quantity;
        tracing::debug!(session_id, item = item.id, quantity, "item added to cart");

        let notice = Notification::success(
            "Added to cart",
            format!("{} was added to your cart.", item.name),
        );
        TracingSink.notify(notice.clone());
        Ok(Some(notice))
    })
}

/// Endpoint: PUT /cart/items/:id
async fn set_quantity(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<SetQuantityInput>,
) -> Response {
    with_session(&state, &headers, |session, _| {
        session.cart_mut()?.set_quantity(&id, payload.quantity);
        Ok(None)
    })
}

/// Endpoint: DELETE /cart/items/:id
async fn remove_item(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    with_session(&state, &headers, |session, _| {
        session.cart_mut()?.remove_item(&id);
        Ok(None)
    })
}

/// Endpoint: DELETE /cart
async fn clear_cart(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    with_session(&state, &headers, |session, _| {
        session.cart_mut()?.clear();
        Ok(None)
    })
}

/// Runs `op` against the caller's session and renders the result.
///
/// The session lock is held only for the duration of `op`. A visitor
/// without a stored session gets a fresh one that is kept only once `op`
/// changes it.
pub(crate) fn with_session<F>(state: &SharedState, headers: &HeaderMap, op: F) -> Response
where
    F: FnOnce(&mut CheckoutSession, &str) -> Result<Option<Notification>, ApiError>,
{
    let (session_id, is_new_session) = resolve_session_id(headers);

    let response = state.with_session_mut(&session_id, |session| {
        match op(session, session_id.as_str()) {
            Ok(notification) => Json(CartResponse {
                session: session.snapshot(&session_id),
                notification,
            })
            .into_response(),
            Err(err) => err.into_response(),
        }
    });

    with_session_cookie(response, &session_id, is_new_session)
}
