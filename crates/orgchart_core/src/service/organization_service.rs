//! Organization use-case service.
//!
//! # Invariants
//! - Names and industries are stored trimmed.
//! - Deleting an organization removes its contacts and projects.

use super::{ServiceError, ServiceResult};
use crate::model::organization::{Organization, OrganizationId};
use crate::repo::organization_repo::OrganizationRepository;
use crate::repo::RepoError;
use log::info;

/// Organization CRUD facade.
pub struct OrganizationService<R: OrganizationRepository> {
    repo: R,
}

impl<R: OrganizationRepository> OrganizationService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one organization and returns the stored record.
    pub fn create_organization(&self, organization: &Organization) -> ServiceResult<Organization> {
        let normalized = normalize(organization);
        normalized.validate()?;
        self.repo.create_organization(&normalized)?;
        info!(
            "event=organization_create module=service status=ok org={}",
            normalized.id
        );
        Ok(normalized)
    }

    pub fn update_organization(&self, organization: &Organization) -> ServiceResult<()> {
        let normalized = normalize(organization);
        normalized.validate()?;
        self.repo
            .update_organization(&normalized)
            .map_err(|err| not_found_as(err, organization.id))
    }

    pub fn get_organization(&self, id: OrganizationId) -> ServiceResult<Organization> {
        self.repo
            .get_organization(id)?
            .ok_or(ServiceError::OrganizationNotFound(id))
    }

    /// Lists organizations by name.
    pub fn list_organizations(&self) -> ServiceResult<Vec<Organization>> {
        self.repo.list_organizations().map_err(Into::into)
    }

    pub fn delete_organization(&self, id: OrganizationId) -> ServiceResult<()> {
        self.repo
            .delete_organization(id)
            .map_err(|err| not_found_as(err, id))?;
        info!("event=organization_delete module=service status=ok org={id}");
        Ok(())
    }
}

fn normalize(organization: &Organization) -> Organization {
    Organization {
        name: organization.name.trim().to_string(),
        industry: organization.industry.trim().to_string(),
        ..organization.clone()
    }
}

fn not_found_as(err: RepoError, id: OrganizationId) -> ServiceError {
    match err {
        RepoError::NotFound { .. } => ServiceError::OrganizationNotFound(id),
        other => other.into(),
    }
}
