//! Project use-case service.
//!
//! # Invariants
//! - A project and every contact assigned to it share one organization.

use super::{ServiceError, ServiceResult};
use crate::model::contact::ContactId;
use crate::model::organization::OrganizationId;
use crate::model::project::{Project, ProjectAssignment, ProjectId};
use crate::repo::contact_repo::ContactRepository;
use crate::repo::organization_repo::OrganizationRepository;
use crate::repo::project_repo::ProjectRepository;
use crate::repo::RepoError;
use log::info;

pub struct ProjectService<P, C, O>
where
    P: ProjectRepository,
    C: ContactRepository,
    O: OrganizationRepository,
{
    projects: P,
    contacts: C,
    organizations: O,
}

impl<P, C, O> ProjectService<P, C, O>
where
    P: ProjectRepository,
    C: ContactRepository,
    O: OrganizationRepository,
{
    pub fn new(projects: P, contacts: C, organizations: O) -> Self {
        Self {
            projects,
            contacts,
            organizations,
        }
    }

    pub fn create_project(&self, project: &Project) -> ServiceResult<Project> {
        self.organizations
            .get_organization(project.org_id)?
            .ok_or(ServiceError::OrganizationNotFound(project.org_id))?;
        let normalized = Project {
            name: project.name.trim().to_string(),
            ..project.clone()
        };
        self.projects.create_project(&normalized)?;
        info!(
            "event=project_create module=service status=ok org={} project={}",
            normalized.org_id, normalized.id
        );
        Ok(normalized)
    }

    pub fn update_project(&self, project: &Project) -> ServiceResult<()> {
        let existing = self.get_project(project.id)?;
        let normalized = Project {
            name: project.name.trim().to_string(),
            org_id: existing.org_id,
            ..project.clone()
        };
        self.projects
            .update_project(&normalized)
            .map_err(|err| not_found_as(err, project.id))
    }

    pub fn get_project(&self, id: ProjectId) -> ServiceResult<Project> {
        self.projects
            .get_project(id)?
            .ok_or(ServiceError::ProjectNotFound(id))
    }

    /// Lists projects of one organization, newest start date first.
    pub fn list_projects(&self, org_id: OrganizationId) -> ServiceResult<Vec<Project>> {
        self.projects.list_projects(org_id).map_err(Into::into)
    }

    pub fn delete_project(&self, id: ProjectId) -> ServiceResult<()> {
        self.projects
            .delete_project(id)
            .map_err(|err| not_found_as(err, id))?;
        info!("event=project_delete module=service status=ok project={id}");
        Ok(())
    }

    /// Assigns a contact to a project; re-assigning replaces the role.
    pub fn assign_contact(
        &self,
        contact_id: ContactId,
        project_id: ProjectId,
        role: Option<String>,
    ) -> ServiceResult<()> {
        let project = self.get_project(project_id)?;
        let contact = self
            .contacts
            .get_contact(contact_id)?
            .ok_or(ServiceError::ContactNotFound(contact_id))?;
        if contact.org_id != project.org_id {
            return Err(ServiceError::AssignmentAcrossOrganizations {
                contact_id,
                project_id,
            });
        }

        let role = role
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        self.projects.assign_contact(&ProjectAssignment {
            contact_id,
            project_id,
            role,
        })?;
        info!(
            "event=project_assign module=service status=ok project={project_id} node={contact_id}"
        );
        Ok(())
    }

    pub fn unassign_contact(&self, contact_id: ContactId, project_id: ProjectId) -> ServiceResult<()> {
        self.projects
            .unassign_contact(contact_id, project_id)
            .map_err(Into::into)
    }

    /// Assignments of one project, ordered by contact id.
    pub fn list_assignments(&self, project_id: ProjectId) -> ServiceResult<Vec<ProjectAssignment>> {
        self.get_project(project_id)?;
        self.projects
            .list_assignments(project_id)
            .map_err(Into::into)
    }
}

fn not_found_as(err: RepoError, id: ProjectId) -> ServiceError {
    match err {
        RepoError::NotFound { .. } => ServiceError::ProjectNotFound(id),
        other => other.into(),
    }
}
