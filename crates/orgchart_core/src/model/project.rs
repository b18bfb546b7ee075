//! Project domain model.
//!
//! Projects are the optional scope of a chart: a project chart shows the
//! assigned contacts plus everybody above them in the reporting chain.

use crate::model::contact::ContactId;
use crate::model::organization::OrganizationId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a project.
pub type ProjectId = Uuid;

/// Maintenance campaign or capital project run by an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub org_id: OrganizationId,
    pub name: String,
    /// Serialized as `type` to match the external schema naming.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub status: Option<String>,
    pub description: Option<String>,
    /// ISO `YYYY-MM-DD`, stored as text.
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl Project {
    pub fn new(org_id: OrganizationId, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            org_id,
            name: name.into(),
            kind: None,
            status: None,
            description: None,
            start_date: None,
            end_date: None,
        }
    }
}

/// Link between a contact and a project, with an optional role label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectAssignment {
    pub contact_id: ContactId,
    pub project_id: ProjectId,
    pub role: Option<String>,
}
