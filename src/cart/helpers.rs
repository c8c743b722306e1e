//! Shopping Cart Helpers
//!
//! Session cookie resolution and log formatting for cart operations.

use super::models::CartLine;
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::Response;
use uuid::Uuid;

/// Name of the cookie carrying the checkout session id
pub const SESSION_COOKIE: &str = "cart_session";

/// Reads the session id from the `cart_session` cookie.
///
/// Returns the id and `true` when a fresh one had to be generated, in which
/// case the caller must send it back with [`session_cookie`].
pub fn resolve_session_id(headers: &HeaderMap) -> (String, bool) {
    let existing = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string());

    match existing {
        Some(id) => (id, false),
        None => (Uuid::new_v4().simple().to_string(), true),
    }
}

/// Builds the `Set-Cookie` value for a newly created session
pub fn session_cookie(session_id: &str) -> Option<HeaderValue> {
    HeaderValue::from_str(&format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, session_id
    ))
    .ok()
}

/// Attaches the session cookie to `response` when the session was just created
pub fn with_session_cookie(mut response: Response, session_id: &str, is_new_session: bool) -> Response {
    if is_new_session {
        if let Some(cookie) = session_cookie(session_id) {
            response.headers_mut().insert(header::SET_COOKIE, cookie);
        }
    }
    response
}

/// Produces a human-readable one-line summary for a list of cart lines.
///
/// Example output: `"2x Field Tablet Pro, 1x PDF Automation Pack"`.
pub fn format_item_summary(lines: &[CartLine]) -> String {
    lines
        .iter()
        .map(|line| format!("{}x {}", line.quantity, line.item.name))
        .collect::<Vec<_>>()
        .join(", ")
}
