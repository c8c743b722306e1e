//! Organization Store
//!
//! Built once at startup and shared through application state. Ids are
//! random UUIDs, so they stay unique across restarts and replicas.

use super::models::{
    CallerContext, CreateOrganizationInput, Organization, OrganizationError,
    UpdateOrganizationInput,
};
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct OrganizationStore {
    organizations: DashMap<String, Organization>,
}

impl OrganizationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, input: CreateOrganizationInput) -> Result<Organization, OrganizationError> {
        let name = valid_name(&input.name)?;
        let organization = Organization {
            id: Uuid::new_v4().to_string(),
            name,
            created_at: Utc::now(),
            logo_url: input.logo_url,
            settings: input.settings,
        };

        self.organizations
            .insert(organization.id.clone(), organization.clone());
        tracing::info!(id = %organization.id, name = %organization.name, "organization created");
        Ok(organization)
    }

    /// Every organization for an admin; otherwise only the caller's own.
    /// Oldest first.
    pub fn list(&self, caller: &CallerContext) -> Vec<Organization> {
        let mut visible: Vec<_> = self
            .organizations
            .iter()
            .filter(|entry| caller.can_access(entry.key()))
            .map(|entry| entry.value().clone())
            .collect();

        visible.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        visible
    }

    pub fn get(&self, id: &str) -> Option<Organization> {
        self.organizations.get(id).map(|entry| entry.value().clone())
    }

    pub fn update(
        &self,
        caller: &CallerContext,
        id: &str,
        input: UpdateOrganizationInput,
    ) -> Result<Organization, OrganizationError> {
        let mut entry = self
            .organizations
            .get_mut(id)
            .ok_or_else(|| OrganizationError::NotFound(id.to_string()))?;
        if !caller.can_access(id) {
            return Err(OrganizationError::Forbidden(id.to_string()));
        }

        let name = input.name.as_deref().map(valid_name).transpose()?;

        let organization = entry.value_mut();
        if let Some(name) = name {
            organization.name = name;
        }
        if let Some(logo_url) = input.logo_url {
            organization.logo_url = Some(logo_url);
        }
        if let Some(settings) = input.settings {
            organization.settings = Some(settings);
        }

        tracing::info!(id, "organization updated");
        Ok(organization.clone())
    }

    /// Removes an organization and returns it
    pub fn delete(&self, caller: &CallerContext, id: &str) -> Result<Organization, OrganizationError> {
        if !self.organizations.contains_key(id) {
            return Err(OrganizationError::NotFound(id.to_string()));
        }
        if !caller.can_access(id) {
            return Err(OrganizationError::Forbidden(id.to_string()));
        }

        let (_, removed) = self
            .organizations
            .remove(id)
            .ok_or_else(|| OrganizationError::NotFound(id.to_string()))?;
        tracing::info!(id, "organization deleted");
        Ok(removed)
    }

    pub fn len(&self) -> usize {
        self.organizations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.organizations.is_empty()
    }
}

fn valid_name(name: &str) -> Result<String, OrganizationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err(OrganizationError::InvalidName)
    } else {
        Ok(trimmed.to_string())
    }
}
