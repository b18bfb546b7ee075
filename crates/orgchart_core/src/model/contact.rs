//! Contact domain model.
//!
//! # Responsibility
//! - Define the person record that org charts are built from.
//! - Validate user-entered fields before persistence.
//!
//! # Invariants
//! - `id` is stable and never reused for another contact.
//! - `level` is a descriptive rank in `0..=4`; it is never derived from, or
//!   checked against, the position in the reporting tree.

use crate::model::organization::OrganizationId;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a contact.
pub type ContactId = Uuid;

/// Highest descriptive level (individual contributor).
pub const MAX_CONTACT_LEVEL: u8 = 4;

static EMAIL_PATTERN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

/// Person record with an optional reports-to link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub org_id: OrganizationId,
    pub first_name: String,
    pub last_name: String,
    pub title: Option<String>,
    pub department: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    /// Manager reference. `None` means the contact reports to nobody.
    pub parent_id: Option<ContactId>,
    /// 0 = executive ... 4 = individual contributor.
    pub level: u8,
    pub responsibilities: Option<String>,
    pub project_types: Option<String>,
    pub notes: Option<String>,
}

impl Contact {
    /// Creates a root-level contact with a generated stable ID.
    pub fn new(
        org_id: OrganizationId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self::with_id(Uuid::new_v4(), org_id, first_name, last_name)
    }

    /// Creates a contact with a caller-provided ID.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(
        id: ContactId,
        org_id: OrganizationId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            org_id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            title: None,
            department: None,
            email: None,
            phone: None,
            location: None,
            parent_id: None,
            level: 0,
            responsibilities: None,
            project_types: None,
            notes: None,
        }
    }

    /// Display name as shown on chart nodes.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Checks user-entered fields.
    ///
    /// Does not look at `parent_id`; reporting links are checked by the
    /// contact service, which can see the rest of the organization.
    pub fn validate(&self) -> Result<(), ContactValidationError> {
        if self.first_name.trim().is_empty() {
            return Err(ContactValidationError::MissingFirstName);
        }
        if self.last_name.trim().is_empty() {
            return Err(ContactValidationError::MissingLastName);
        }
        if let Some(email) = self.email.as_deref().filter(|value| !value.is_empty()) {
            if !is_valid_email(email) {
                return Err(ContactValidationError::InvalidEmail(email.to_string()));
            }
        }
        if self.level > MAX_CONTACT_LEVEL {
            return Err(ContactValidationError::LevelOutOfRange(self.level));
        }
        Ok(())
    }
}

/// Returns whether `value` looks like `local@domain.tld`.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(value))
}

/// Field-level validation failure for [`Contact`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactValidationError {
    MissingFirstName,
    MissingLastName,
    InvalidEmail(String),
    LevelOutOfRange(u8),
}

impl Display for ContactValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingFirstName => write!(f, "first name is required"),
            Self::MissingLastName => write!(f, "last name is required"),
            Self::InvalidEmail(value) => write!(f, "invalid email format: `{value}`"),
            Self::LevelOutOfRange(level) => write!(
                f,
                "level {level} is out of range; expected 0..={MAX_CONTACT_LEVEL}"
            ),
        }
    }
}

impl Error for ContactValidationError {}
