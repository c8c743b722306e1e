//! REST API handlers for the organization registry
//!
//! Callers are identified by the headers the auth layer injects; see
//! [`CallerContext::from_headers`].

use super::models::{CallerContext, CreateOrganizationInput, Organization, UpdateOrganizationInput};
use crate::error::ApiError;
use crate::state::SharedState;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, put},
    Json, Router,
};

/// Creates routes for organization CRUD
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route(
            "/organizations",
            get(list_organizations).post(create_organization),
        )
        .route(
            "/organizations/:id",
            put(update_organization).delete(delete_organization),
        )
}

/// Endpoint: POST /organizations
async fn create_organization(
    State(state): State<SharedState>,
    Json(payload): Json<CreateOrganizationInput>,
) -> Result<(StatusCode, Json<Organization>), ApiError> {
    let organization = state.organizations.create(payload)?;
    Ok((StatusCode::CREATED, Json(organization)))
}

/// Endpoint: GET /organizations
async fn list_organizations(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Json<Vec<Organization>> {
    let caller = CallerContext::from_headers(&headers);
    Json(state.organizations.list(&caller))
}

/// Endpoint: PUT /organizations/:id
async fn update_organization(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<UpdateOrganizationInput>,
) -> Result<Json<Organization>, ApiError> {
    let caller = CallerContext::from_headers(&headers);
    let organization = state.organizations.update(&caller, &id, payload)?;
    Ok(Json(organization))
}

/// Endpoint: DELETE /organizations/:id
async fn delete_organization(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let caller = CallerContext::from_headers(&headers);
    state.organizations.delete(&caller, &id)?;
    Ok(StatusCode::NO_CONTENT)
}
