//! Integration tests for the landing page HTTP API
//!
//! These tests drive the full router with `oneshot` requests:
//! - Catalog listing
//! - Cart operations and session cookies
//! - Contact form updates
//! - Checkout outcomes (rejected, sent, failed, crashed) and in-flight locking
//! - Session storage and idle eviction
//! - Organization registry scoping

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tower::util::ServiceExt; // for `oneshot`

use landing_checkout_rust::checkout::{
    CheckoutSubmitter, DeliveryClient, DeliveryEnvelope, DeliveryError,
};
use landing_checkout_rust::organizations::OrganizationStore;
use landing_checkout_rust::router::create_app_router;
use landing_checkout_rust::state::{AppState, SharedState};

/// Delivery client answering with a fixed outcome and counting calls
struct StubDelivery {
    outcome: Result<(), DeliveryError>,
    calls: AtomicUsize,
}

#[async_trait]
impl DeliveryClient for StubDelivery {
    async fn deliver(&self, _envelope: &DeliveryEnvelope<'_>) -> Result<(), DeliveryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

/// Holds each delivery open until the test releases it
struct GatedDelivery {
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl DeliveryClient for GatedDelivery {
    async fn deliver(&self, _envelope: &DeliveryEnvelope<'_>) -> Result<(), DeliveryError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(())
    }
}

/// Delivery client that crashes mid-request
struct PanickingDelivery;

#[async_trait]
impl DeliveryClient for PanickingDelivery {
    async fn deliver(&self, _envelope: &DeliveryEnvelope<'_>) -> Result<(), DeliveryError> {
        panic!("delivery client crashed");
    }
}

/// Helper function to create a test app around any delivery client,
/// returning the shared state for inspection
fn create_test_app_with(client: Arc<dyn DeliveryClient>) -> (axum::Router, SharedState) {
    let submitter = CheckoutSubmitter::new(client, "sales@example.com", "New order request");
    let state = Arc::new(AppState::new(submitter, OrganizationStore::new()));
    (create_app_router(state.clone()), state)
}

/// Helper function to create a test app whose deliveries end in `outcome`
fn create_test_app(outcome: Result<(), DeliveryError>) -> (axum::Router, Arc<StubDelivery>) {
    let stub = Arc::new(StubDelivery {
        outcome,
        calls: AtomicUsize::new(0),
    });
    let (app, _) = create_test_app_with(stub.clone());
    (app, stub)
}

/// Fills in the contact fields checkout requires
async fn fill_contact_info(app: &axum::Router, cookie: &str) {
    let (status, _, _) = send(
        app,
        "PATCH",
        "/customer",
        Some(cookie),
        &[],
        Some(json!({ "name": "Jane", "email": "jane@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

/// Helper function to send a request and decode the JSON response.
/// Returns the status, the body and the session cookie set by the server.
async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    headers: &[(&str, &str)],
    body: Option<Value>,
) -> (StatusCode, Value, Option<String>) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(String::from);

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(json!({}));

    (status, body, set_cookie)
}

/// Starts a session by adding the given items, returning its cookie
async fn session_with_items(app: &axum::Router, ids: &[&str]) -> String {
    let (_, _, cookie) = send(app, "GET", "/cart", None, &[], None).await;
    let cookie = cookie.expect("new session sets a cookie");
    for id in ids {
        let (status, _, _) = send(
            app,
            "POST",
            "/cart/items",
            Some(&cookie),
            &[],
            Some(json!({ "id": id })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
    cookie
}

#[tokio::test]
async fn test_catalog_lists_items() {
    let (app, _) = create_test_app(Ok(()));

    let (status, body, _) = send(&app, "GET", "/catalog", None, &[], None).await;

    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 6);
    assert_eq!(items[0]["id"], "1");
    assert_eq!(items[0]["price"], 450.0);
    assert!(items[0]["inStock"].is_boolean());
}

#[tokio::test]
async fn test_new_session_sets_cookie_and_is_empty() {
    let (app, _) = create_test_app(Ok(()));

    let (status, body, cookie) = send(&app, "GET", "/cart", None, &[], None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(cookie.unwrap().starts_with("cart_session="));
    assert_eq!(body["lineCount"], 0);
    assert_eq!(body["itemCount"], 0);
    assert_eq!(body["total"], 0.0);
    assert_eq!(body["submitting"], false);
}

#[tokio::test]
async fn test_add_item_aggregates_and_notifies() {
    let (app, _) = create_test_app(Ok(()));
    let cookie = session_with_items(&app, &["1"]).await;

    let (status, body, set_cookie) = send(
        &app,
        "POST",
        "/cart/items",
        Some(&cookie),
        &[],
        Some(json!({ "id": "1" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(set_cookie.is_none(), "existing session keeps its cookie");
    assert_eq!(body["lineCount"], 1);
    assert_eq!(body["itemCount"], 2);
    assert_eq!(body["items"][0]["quantity"], 2);
    assert_eq!(body["total"], 900.0);
    assert_eq!(body["notification"]["kind"], "success");
    assert_eq!(body["notification"]["title"], "Added to cart");
}

#[tokio::test]
async fn test_add_unknown_item_is_not_found() {
    let (app, _) = create_test_app(Ok(()));

    let (status, body, _) = send(
        &app,
        "POST",
        "/cart/items",
        None,
        &[],
        Some(json!({ "id": "nope" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("nope"));
}

#[tokio::test]
async fn test_quantity_updates_and_removal() {
    let (app, _) = create_test_app(Ok(()));
    let cookie = session_with_items(&app, &["1", "4"]).await;

    let (_, body, _) = send(
        &app,
        "PUT",
        "/cart/items/4",
        Some(&cookie),
        &[],
        Some(json!({ "quantity": 3 })),
    )
    .await;
    assert_eq!(body["itemCount"], 4);

    let (_, body, _) = send(
        &app,
        "PUT",
        "/cart/items/1",
        Some(&cookie),
        &[],
        Some(json!({ "quantity": 0 })),
    )
    .await;
    assert_eq!(body["lineCount"], 1);
    assert_eq!(body["items"][0]["id"], "4");

    let (_, body, _) = send(&app, "DELETE", "/cart/items/4", Some(&cookie), &[], None).await;
    assert_eq!(body["lineCount"], 0);

    let (status, body, _) = send(&app, "DELETE", "/cart/items/4", Some(&cookie), &[], None).await;
    assert_eq!(status, StatusCode::OK, "removing a missing line is a no-op");
    assert_eq!(body["lineCount"], 0);
}

#[tokio::test]
async fn test_clear_cart() {
    let (app, _) = create_test_app(Ok(()));
    let cookie = session_with_items(&app, &["1", "2", "3"]).await;

    let (status, body, _) = send(&app, "DELETE", "/cart", Some(&cookie), &[], None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lineCount"], 0);
    assert_eq!(body["total"], 0.0);
}

#[tokio::test]
async fn test_customer_patch_is_structural() {
    let (app, _) = create_test_app(Ok(()));
    let cookie = session_with_items(&app, &[]).await;

    send(
        &app,
        "PATCH",
        "/customer",
        Some(&cookie),
        &[],
        Some(json!({ "name": "Jane", "phone": "555-0100" })),
    )
    .await;
    let (_, body, _) = send(
        &app,
        "PATCH",
        "/customer",
        Some(&cookie),
        &[],
        Some(json!({ "email": "jane@x.com" })),
    )
    .await;

    assert_eq!(body["customer"]["name"], "Jane");
    assert_eq!(body["customer"]["phone"], "555-0100");
    assert_eq!(body["customer"]["email"], "jane@x.com");
    assert_eq!(body["customer"]["address"], "");
}

#[tokio::test]
async fn test_checkout_empty_cart_is_rejected() {
    let (app, stub) = create_test_app(Ok(()));

    let (status, body, _) = send(&app, "POST", "/checkout", None, &[], None).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], "rejected");
    assert_eq!(body["notification"]["kind"], "warning");
    assert_eq!(body["closeCheckout"], false);
    assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_checkout_missing_contact_info_keeps_cart() {
    let (app, stub) = create_test_app(Ok(()));
    let cookie = session_with_items(&app, &["1"]).await;

    let (status, body, _) = send(&app, "POST", "/checkout", Some(&cookie), &[], None).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["notification"]["title"], "Missing information");
    assert!(body["notification"]["message"]
        .as_str()
        .unwrap()
        .contains("name, email"));
    assert_eq!(body["session"]["lineCount"], 1);
    assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_checkout_success_resets_session() {
    let (app, stub) = create_test_app(Ok(()));
    let cookie = session_with_items(&app, &["1", "1", "4"]).await;
    send(
        &app,
        "PATCH",
        "/customer",
        Some(&cookie),
        &[],
        Some(json!({ "name": "Jane", "email": "jane@x.com" })),
    )
    .await;

    let (status, body, _) = send(&app, "POST", "/checkout", Some(&cookie), &[], None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "sent");
    assert_eq!(body["closeCheckout"], true);
    assert_eq!(body["notification"]["kind"], "success");
    assert_eq!(body["submission"]["total"], 1085.75);
    assert_eq!(body["session"]["lineCount"], 0);
    assert_eq!(body["session"]["customer"]["name"], "");
    assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_checkout_failure_keeps_session() {
    let (app, stub) = create_test_app(Err(DeliveryError::Rejected(500)));
    let cookie = session_with_items(&app, &["1", "1", "4"]).await;
    send(
        &app,
        "PATCH",
        "/customer",
        Some(&cookie),
        &[],
        Some(json!({ "name": "Jane", "email": "jane@x.com" })),
    )
    .await;

    let (status, body, _) = send(&app, "POST", "/checkout", Some(&cookie), &[], None).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["status"], "failed");
    assert_eq!(body["notification"]["kind"], "error");
    assert_eq!(body["session"]["lineCount"], 2);
    assert_eq!(body["session"]["customer"]["email"], "jane@x.com");
    assert_eq!(body["session"]["submitting"], false);
    assert_eq!(stub.calls.load(Ordering::SeqCst), 1);

    // The shopper can retry straight away.
    let (status, _, _) = send(&app, "POST", "/checkout", Some(&cookie), &[], None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(stub.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_cookieless_reads_do_not_store_sessions() {
    let (app, state) = create_test_app_with(Arc::new(StubDelivery {
        outcome: Ok(()),
        calls: AtomicUsize::new(0),
    }));

    for _ in 0..50 {
        let (status, _, cookie) = send(&app, "GET", "/cart", None, &[], None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(cookie.is_some());
    }
    let (status, _, _) = send(
        &app,
        "POST",
        "/cart/items",
        None,
        &[],
        Some(json!({ "id": "nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _, _) = send(&app, "POST", "/checkout", None, &[], None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(state.sessions.len(), 0);

    let cookie = session_with_items(&app, &["2"]).await;
    assert_eq!(state.sessions.len(), 1);
    let (_, body, _) = send(&app, "GET", "/cart", Some(&cookie), &[], None).await;
    assert_eq!(body["items"][0]["id"], "2");
}

#[tokio::test]
async fn test_idle_sessions_are_evicted() {
    let (app, state) = create_test_app_with(Arc::new(StubDelivery {
        outcome: Ok(()),
        calls: AtomicUsize::new(0),
    }));
    let cookie = session_with_items(&app, &["1"]).await;
    assert_eq!(state.sessions.len(), 1);

    assert_eq!(state.evict_idle(std::time::Duration::ZERO), 1);

    let (status, body, _) = send(&app, "GET", "/cart", Some(&cookie), &[], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lineCount"], 0);
    assert_eq!(state.sessions.len(), 0);
}

#[tokio::test]
async fn test_session_is_locked_while_checkout_is_sending() {
    let gate = Arc::new(GatedDelivery {
        entered: Notify::new(),
        release: Notify::new(),
    });
    let (app, _) = create_test_app_with(gate.clone());
    let cookie = session_with_items(&app, &["1", "4"]).await;
    fill_contact_info(&app, &cookie).await;

    let in_flight = {
        let app = app.clone();
        let cookie = cookie.clone();
        tokio::spawn(async move { send(&app, "POST", "/checkout", Some(&cookie), &[], None).await })
    };
    gate.entered.notified().await;

    let (status, body, _) = send(
        &app,
        "PUT",
        "/cart/items/1",
        Some(&cookie),
        &[],
        Some(json!({ "quantity": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("in progress"));

    let (status, _, _) = send(
        &app,
        "PATCH",
        "/customer",
        Some(&cookie),
        &[],
        Some(json!({ "email": "other@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _, _) = send(&app, "DELETE", "/cart", Some(&cookie), &[], None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body, _) = send(&app, "POST", "/checkout", Some(&cookie), &[], None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "in_progress");
    assert!(body["notification"].is_null());

    let (status, body, _) = send(&app, "GET", "/cart", Some(&cookie), &[], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["submitting"], true);
    assert_eq!(body["items"][0]["quantity"], 1);

    gate.release.notify_one();
    let (status, body, _) = in_flight.await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["submission"]["customer"]["email"], "jane@x.com");
    assert_eq!(body["session"]["lineCount"], 0);
}

#[tokio::test]
async fn test_crashed_checkout_leaves_session_usable() {
    let (app, _) = create_test_app_with(Arc::new(PanickingDelivery));
    let cookie = session_with_items(&app, &["1", "1"]).await;
    fill_contact_info(&app, &cookie).await;

    let (status, body, _) = send(&app, "POST", "/checkout", Some(&cookie), &[], None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "failed");
    assert_eq!(body["notification"]["kind"], "error");
    assert_eq!(body["session"]["submitting"], false);
    assert_eq!(body["session"]["itemCount"], 2);

    // A retry reaches the client again rather than being refused.
    let (status, body, _) = send(&app, "POST", "/checkout", Some(&cookie), &[], None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "failed");

    let (status, body, _) = send(
        &app,
        "PUT",
        "/cart/items/1",
        Some(&cookie),
        &[],
        Some(json!({ "quantity": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["itemCount"], 3);

    let (status, body, _) = send(&app, "DELETE", "/cart", Some(&cookie), &[], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lineCount"], 0);
}

#[tokio::test]
async fn test_organization_crud_and_scoping() {
    let (app, _) = create_test_app(Ok(()));
    let admin = [("x-caller-role", "admin")];

    let (status, alpha, _) = send(
        &app,
        "POST",
        "/organizations",
        None,
        &admin,
        Some(json!({ "name": "Alpha Electric", "logoUrl": "https://cdn.example.com/alpha.png" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let alpha_id = alpha["id"].as_str().unwrap().to_string();
    assert!(alpha["createdAt"].is_string());

    let (_, beta, _) = send(
        &app,
        "POST",
        "/organizations",
        None,
        &admin,
        Some(json!({ "name": "Beta HVAC" })),
    )
    .await;
    let beta_id = beta["id"].as_str().unwrap().to_string();

    let (_, all, _) = send(&app, "GET", "/organizations", None, &admin, None).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let member = [
        ("x-caller-role", "member"),
        ("x-caller-organizations", alpha_id.as_str()),
    ];
    let (_, scoped, _) = send(&app, "GET", "/organizations", None, &member, None).await;
    let scoped = scoped.as_array().unwrap();
    assert_eq!(scoped.len(), 1);
    assert_eq!(scoped[0]["name"], "Alpha Electric");

    let (status, updated, _) = send(
        &app,
        "PUT",
        &format!("/organizations/{}", alpha_id),
        None,
        &member,
        Some(json!({ "name": "Alpha Electric Co" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Alpha Electric Co");
    assert_eq!(updated["logoUrl"], "https://cdn.example.com/alpha.png");

    let (status, _, _) = send(
        &app,
        "DELETE",
        &format!("/organizations/{}", beta_id),
        None,
        &member,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, _) = send(
        &app,
        "DELETE",
        &format!("/organizations/{}", beta_id),
        None,
        &admin,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _, _) = send(
        &app,
        "PUT",
        &format!("/organizations/{}", beta_id),
        None,
        &admin,
        Some(json!({ "name": "Gone" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_organization_requires_name() {
    let (app, _) = create_test_app(Ok(()));

    let (status, body, _) = send(
        &app,
        "POST",
        "/organizations",
        None,
        &[],
        Some(json!({ "name": "  " })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}
