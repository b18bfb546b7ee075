//! Chart use-case service.
//!
//! # Responsibility
//! - Re-read one organization's contacts and rebuild its forest.
//! - Narrow a chart to one project while keeping chains of command.
//! - Produce layouts and account briefs from the same read.
//!
//! # Invariants
//! - Nothing is cached; every call reflects the current store.

use super::{ServiceError, ServiceResult};
use crate::hierarchy::{build_forest, with_management_chain, Forest};
use crate::layout::{layout_forest, ChartLayout, LayoutConfig};
use crate::model::contact::{Contact, ContactId};
use crate::model::organization::OrganizationId;
use crate::model::project::ProjectId;
use crate::repo::contact_repo::ContactRepository;
use crate::repo::organization_repo::OrganizationRepository;
use crate::repo::project_repo::ProjectRepository;
use crate::transfer::brief::{now_epoch_ms, AccountBrief};
use log::info;

/// A built forest together with its computed positions.
#[derive(Debug, Clone, PartialEq)]
pub struct OrgChart {
    pub forest: Forest,
    pub layout: ChartLayout,
}

pub struct ChartService<O, C, P>
where
    O: OrganizationRepository,
    C: ContactRepository,
    P: ProjectRepository,
{
    organizations: O,
    contacts: C,
    projects: P,
}

impl<O, C, P> ChartService<O, C, P>
where
    O: OrganizationRepository,
    C: ContactRepository,
    P: ProjectRepository,
{
    pub fn new(organizations: O, contacts: C, projects: P) -> Self {
        Self {
            organizations,
            contacts,
            projects,
        }
    }

    /// Builds the reporting forest of `org_id`.
    ///
    /// With `project_id`, only contacts assigned to that project and their
    /// managers are included.
    ///
    /// # Errors
    /// - `OrganizationNotFound` when `org_id` is unknown.
    /// - `ProjectNotFound` when the project is unknown or belongs to
    ///   another organization.
    pub fn org_chart(
        &self,
        org_id: OrganizationId,
        project_id: Option<ProjectId>,
    ) -> ServiceResult<Forest> {
        let contacts = self.chart_contacts(org_id, project_id)?;
        let forest = build_forest(&contacts);
        info!(
            "event=org_chart module=service status=ok org={org_id} scoped={} nodes={} roots={} detached={}",
            project_id.is_some(),
            forest.len(),
            forest.roots().len(),
            forest.detached().len()
        );
        Ok(forest)
    }

    /// Builds and lays out the chart of `org_id`.
    pub fn org_layout(
        &self,
        org_id: OrganizationId,
        project_id: Option<ProjectId>,
        config: &LayoutConfig,
    ) -> ServiceResult<OrgChart> {
        config.validate()?;
        let forest = self.org_chart(org_id, project_id)?;
        let layout = layout_forest(&forest, config)?;
        Ok(OrgChart { forest, layout })
    }

    /// Snapshot of the organization, its contacts and projects.
    pub fn account_brief(&self, org_id: OrganizationId) -> ServiceResult<AccountBrief> {
        let organization = self
            .organizations
            .get_organization(org_id)?
            .ok_or(ServiceError::OrganizationNotFound(org_id))?;
        let contacts = self.contacts.list_contacts(org_id)?;
        let projects = self.projects.list_projects(org_id)?;
        info!(
            "event=account_brief module=service status=ok org={org_id} contacts={} projects={}",
            contacts.len(),
            projects.len()
        );
        Ok(AccountBrief::new(
            organization,
            contacts,
            projects,
            now_epoch_ms(),
        ))
    }

    fn chart_contacts(
        &self,
        org_id: OrganizationId,
        project_id: Option<ProjectId>,
    ) -> ServiceResult<Vec<Contact>> {
        self.organizations
            .get_organization(org_id)?
            .ok_or(ServiceError::OrganizationNotFound(org_id))?;
        let contacts = self.contacts.list_contacts(org_id)?;

        let Some(project_id) = project_id else {
            return Ok(contacts);
        };
        let project = self
            .projects
            .get_project(project_id)?
            .filter(|project| project.org_id == org_id)
            .ok_or(ServiceError::ProjectNotFound(project_id))?;
        let members: Vec<ContactId> = self
            .projects
            .list_assignments(project.id)?
            .into_iter()
            .map(|assignment| assignment.contact_id)
            .collect();
        Ok(with_management_chain(&contacts, &members))
    }
}
