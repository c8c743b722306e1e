//! REST handler for checkout submission
//!
//! The page calls `POST /checkout` once per click. The response carries the
//! single notification produced by the attempt and the session as it stands
//! afterwards.

use super::error::CheckoutError;
use super::models::Submission;
use super::session::{lock_session, CheckoutSession, SessionSnapshot};
use super::submitter::delivery_failure_notice;
use crate::cart::helpers::{resolve_session_id, with_session_cookie};
use crate::error::ApiError;
use crate::notify::{Notification, NotificationSink, RecordingSink, Tee, TracingSink};
use crate::state::SharedState;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use std::sync::{Arc, Mutex};

/// Creates routes for checkout operations
pub fn routes() -> Router<SharedState> {
    Router::new().route("/checkout", post(checkout))
}

/// Response for a checkout attempt
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    /// `sent`, `rejected`, `failed` or `in_progress`
    pub status: &'static str,

    pub notification: Option<Notification>,

    pub close_checkout: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission: Option<Submission>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub session: SessionSnapshot,
}

/// Endpoint: POST /checkout
async fn checkout(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let (session_id, is_new_session) = resolve_session_id(&headers);
    // An unknown visitor has nothing to submit; the attempt runs against a
    // throwaway session and is rejected as an empty cart.
    let session = state.session_or_scratch(&session_id);
    let recorder = Arc::new(RecordingSink::new());

    // Run the attempt on its own task so a dropped connection cannot
    // abandon the session in the sending phase.
    let task = {
        let submitter = state.submitter.clone();
        let session = session.clone();
        let recorder = recorder.clone();
        tokio::spawn(async move {
            let sink = Tee::new(&TracingSink, recorder.as_ref());
            submitter.submit(&session, &sink).await
        })
    };

    let (status, body) = match task.await {
        Ok(Ok(receipt)) => (
            StatusCode::OK,
            CheckoutResponse {
                status: "sent",
                notification: recorder.take().into_iter().next(),
                close_checkout: receipt.close_checkout,
                submission: Some(receipt.submission),
                error: None,
                session: lock_session(&session).snapshot(&session_id),
            },
        ),
        Ok(Err(err)) => (
            ApiError::from(err.clone()).status(),
            CheckoutResponse {
                status: outcome_label(&err),
                notification: recorder.take().into_iter().next(),
                close_checkout: false,
                submission: None,
                error: Some(err.to_string()),
                session: lock_session(&session).snapshot(&session_id),
            },
        ),
        Err(e) => {
            tracing::error!(error = %e, session_id = %session_id, "checkout task failed");
            (StatusCode::INTERNAL_SERVER_ERROR, abandoned_attempt(&session, &session_id, &recorder))
        }
    };

    with_session_cookie((status, Json(body)).into_response(), &session_id, is_new_session)
}

fn outcome_label(err: &CheckoutError) -> &'static str {
    if err.is_rejection() {
        "rejected"
    } else if err.is_delivery_failure() {
        "failed"
    } else {
        "in_progress"
    }
}

/// Reports an attempt whose task died before returning an outcome.
///
/// The submitter's guard has already put the session back to `Idle` with
/// its cart and form intact; the shopper gets the usual failure notice
/// unless one was already emitted.
fn abandoned_attempt(
    session: &Mutex<CheckoutSession>,
    session_id: &str,
    recorder: &RecordingSink,
) -> CheckoutResponse {
    let notification = recorder.take().into_iter().next().unwrap_or_else(|| {
        let notice = delivery_failure_notice();
        TracingSink.notify(notice.clone());
        notice
    });

    let session = lock_session(session);
    CheckoutResponse {
        status: "failed",
        notification: Some(notification),
        close_checkout: false,
        submission: None,
        error: Some("checkout failed unexpectedly".into()),
        session: session.snapshot(session_id),
    }
}
