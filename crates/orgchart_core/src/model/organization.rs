//! Organization domain model.
//!
//! An organization owns contacts and projects; deleting it cascades to both.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for an organization.
pub type OrganizationId = Uuid;

/// Company/customer record, e.g. an operator or an EPC contractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: OrganizationId,
    pub name: String,
    /// Oil & Gas, Petrochemical, LNG, EPC, ...
    pub industry: String,
    /// Upstream, Downstream, ...
    pub sector: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

impl Organization {
    /// Creates an organization with a generated stable ID.
    pub fn new(name: impl Into<String>, industry: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            industry: industry.into(),
            sector: None,
            location: None,
            notes: None,
        }
    }

    /// Checks required fields.
    pub fn validate(&self) -> Result<(), OrganizationValidationError> {
        if self.name.trim().is_empty() {
            return Err(OrganizationValidationError::MissingName);
        }
        if self.industry.trim().is_empty() {
            return Err(OrganizationValidationError::MissingIndustry);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrganizationValidationError {
    MissingName,
    MissingIndustry,
}

impl Display for OrganizationValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingName => write!(f, "organization name is required"),
            Self::MissingIndustry => write!(f, "organization industry is required"),
        }
    }
}

impl Error for OrganizationValidationError {}
