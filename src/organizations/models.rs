//! Organization Domain Models

use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

/// Header carrying the caller's role, set by the auth layer in front of us
pub const ROLE_HEADER: &str = "x-caller-role";
/// Header carrying the comma-separated organization ids the caller may see
pub const ORGANIZATIONS_HEADER: &str = "x-caller-organizations";

/// A tenant organization
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    /// Free-form tenant settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,
}

/// Body for `POST /organizations`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrganizationInput {
    pub name: String,
    pub logo_url: Option<String>,
    pub settings: Option<Value>,
}

/// Body for `PUT /organizations/:id`; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrganizationInput {
    pub name: Option<String>,
    pub logo_url: Option<String>,
    pub settings: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallerRole {
    /// Sees and manages every organization
    Admin,
    Member,
}

/// Who is calling, as established by the external auth layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerContext {
    pub role: CallerRole,
    pub organizations: HashSet<String>,
}

impl CallerContext {
    pub fn admin() -> Self {
        Self {
            role: CallerRole::Admin,
            organizations: HashSet::new(),
        }
    }

    pub fn member<I, S>(organizations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            role: CallerRole::Member,
            organizations: organizations.into_iter().map(Into::into).collect(),
        }
    }

    /// Reads the caller from the auth headers. Missing headers mean a member
    /// with no organizations.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let role = match headers.get(ROLE_HEADER).and_then(|v| v.to_str().ok()) {
            Some(role) if role.trim().eq_ignore_ascii_case("admin") => CallerRole::Admin,
            _ => CallerRole::Member,
        };

        let organizations: HashSet<String> = headers
            .get(ORGANIZATIONS_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Self { role, organizations }
    }

    pub fn is_elevated(&self) -> bool {
        self.role == CallerRole::Admin
    }

    pub fn can_access(&self, organization_id: &str) -> bool {
        self.is_elevated() || self.organizations.contains(organization_id)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrganizationError {
    #[error("Organization not found: {0}")]
    NotFound(String),

    #[error("Not allowed to manage organization {0}")]
    Forbidden(String),

    #[error("Organization name must not be empty")]
    InvalidName,
}
