//! Use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Check cross-record rules (organization ownership, reporting links)
//!   that a single repository call cannot see.
//!
//! # Invariants
//! - Service APIs never bypass repository validation.
//! - Charts are rebuilt from a fresh contact read on every call.

pub mod chart_service;
pub mod contact_service;
pub mod organization_service;
pub mod project_service;

use crate::layout::LayoutError;
use crate::model::contact::{ContactId, ContactValidationError};
use crate::model::organization::{OrganizationId, OrganizationValidationError};
use crate::model::project::ProjectId;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors from service operations.
#[derive(Debug)]
pub enum ServiceError {
    InvalidContact(ContactValidationError),
    InvalidOrganization(OrganizationValidationError),
    OrganizationNotFound(OrganizationId),
    ContactNotFound(ContactId),
    ProjectNotFound(ProjectId),
    /// Requested manager does not exist.
    ParentNotFound(ContactId),
    /// Requested manager belongs to another organization.
    ParentInOtherOrganization {
        contact_id: ContactId,
        parent_id: ContactId,
    },
    /// Contacts cannot move between organizations.
    OrganizationChanged(ContactId),
    /// Contact and project belong to different organizations.
    AssignmentAcrossOrganizations {
        contact_id: ContactId,
        project_id: ProjectId,
    },
    /// Re-parenting would make the contact report to itself.
    CycleDetected {
        contact_id: ContactId,
        parent_id: ContactId,
    },
    Layout(LayoutError),
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidContact(err) => write!(f, "{err}"),
            Self::InvalidOrganization(err) => write!(f, "{err}"),
            Self::OrganizationNotFound(id) => write!(f, "organization not found: {id}"),
            Self::ContactNotFound(id) => write!(f, "contact not found: {id}"),
            Self::ProjectNotFound(id) => write!(f, "project not found: {id}"),
            Self::ParentNotFound(id) => write!(f, "manager contact not found: {id}"),
            Self::ParentInOtherOrganization {
                contact_id,
                parent_id,
            } => write!(
                f,
                "manager {parent_id} of contact {contact_id} belongs to another organization"
            ),
            Self::OrganizationChanged(id) => {
                write!(f, "contact {id} cannot move to another organization")
            }
            Self::AssignmentAcrossOrganizations {
                contact_id,
                project_id,
            } => write!(
                f,
                "contact {contact_id} and project {project_id} belong to different organizations"
            ),
            Self::CycleDetected {
                contact_id,
                parent_id,
            } => write!(
                f,
                "reporting change would create cycle: contact {contact_id} under {parent_id}"
            ),
            Self::Layout(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidContact(err) => Some(err),
            Self::InvalidOrganization(err) => Some(err),
            Self::Layout(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::ContactValidation(err) => Self::InvalidContact(err),
            RepoError::OrganizationValidation(err) => Self::InvalidOrganization(err),
            other => Self::Repo(other),
        }
    }
}

impl From<ContactValidationError> for ServiceError {
    fn from(value: ContactValidationError) -> Self {
        Self::InvalidContact(value)
    }
}

impl From<OrganizationValidationError> for ServiceError {
    fn from(value: OrganizationValidationError) -> Self {
        Self::InvalidOrganization(value)
    }
}

impl From<LayoutError> for ServiceError {
    fn from(value: LayoutError) -> Self {
        Self::Layout(value)
    }
}
