//! REST handler exposing the product catalog

use super::models::{catalog, CatalogItem};
use crate::state::SharedState;
use axum::{routing::get, Json, Router};

/// Creates routes for catalog browsing
pub fn routes() -> Router<SharedState> {
    Router::new().route("/catalog", get(list_catalog))
}

/// Endpoint: GET /catalog
async fn list_catalog() -> Json<&'static [CatalogItem]> {
    Json(catalog())
}
