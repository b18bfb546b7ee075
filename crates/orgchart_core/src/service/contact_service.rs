//! Contact use-case service.
//!
//! # Responsibility
//! - Validate contacts against their organization before persistence.
//! - Keep new reporting links acyclic and inside one organization.
//! - Turn decoded CSV rows into stored contacts.
//!
//! # Invariants
//! - A contact never changes organization after creation.
//! - Writes never create a reporting cycle. Data that already holds one
//!   (raw SQL, older imports) is still accepted by the chart builder.
//! - Deletion never re-parents reports; they turn into roots on the next
//!   chart build.

use super::{ServiceError, ServiceResult};
use crate::model::contact::{Contact, ContactId};
use crate::model::organization::OrganizationId;
use crate::repo::contact_repo::ContactRepository;
use crate::repo::organization_repo::OrganizationRepository;
use crate::repo::RepoError;
use crate::transfer::csv::{CsvRow, ImportReport, ImportRowError, ImportedContact};
use log::{info, warn};
use std::collections::{HashMap, HashSet};

/// Contact CRUD facade with reporting-link checks.
pub struct ContactService<C: ContactRepository, O: OrganizationRepository> {
    contacts: C,
    organizations: O,
}

impl<C: ContactRepository, O: OrganizationRepository> ContactService<C, O> {
    pub fn new(contacts: C, organizations: O) -> Self {
        Self {
            contacts,
            organizations,
        }
    }

    /// Creates one contact and returns the stored record.
    ///
    /// # Errors
    /// - `OrganizationNotFound` when `org_id` is unknown.
    /// - `ParentNotFound` / `ParentInOtherOrganization` for a bad manager.
    /// - `InvalidContact` when field validation fails.
    pub fn create_contact(&self, contact: &Contact) -> ServiceResult<Contact> {
        self.ensure_organization(contact.org_id)?;
        let normalized = normalize(contact);
        normalized.validate()?;
        if let Some(parent_id) = normalized.parent_id {
            self.ensure_parent(&normalized, parent_id)?;
        }

        self.contacts.create_contact(&normalized)?;
        info!(
            "event=contact_create module=service status=ok org={} node={} has_parent={}",
            normalized.org_id,
            normalized.id,
            normalized.parent_id.is_some()
        );
        Ok(normalized)
    }

    /// Replaces every field of an existing contact, including `parent_id`.
    pub fn update_contact(&self, contact: &Contact) -> ServiceResult<()> {
        let existing = self.get_contact(contact.id)?;
        if existing.org_id != contact.org_id {
            return Err(ServiceError::OrganizationChanged(contact.id));
        }
        let normalized = normalize(contact);
        normalized.validate()?;
        if let Some(parent_id) = normalized.parent_id {
            self.ensure_parent(&normalized, parent_id)?;
        }

        self.contacts
            .update_contact(&normalized)
            .map_err(|err| not_found_as(err, contact.id))
    }

    /// Moves a contact under `parent_id`, or to root level with `None`.
    pub fn set_parent(
        &self,
        contact_id: ContactId,
        parent_id: Option<ContactId>,
    ) -> ServiceResult<()> {
        let mut contact = self.get_contact(contact_id)?;
        if let Some(parent_id) = parent_id {
            self.ensure_parent(&contact, parent_id)?;
        }
        contact.parent_id = parent_id;
        self.contacts
            .update_contact(&contact)
            .map_err(|err| not_found_as(err, contact_id))?;
        info!(
            "event=contact_move module=service status=ok node={contact_id} has_parent={}",
            parent_id.is_some()
        );
        Ok(())
    }

    pub fn get_contact(&self, id: ContactId) -> ServiceResult<Contact> {
        self.contacts
            .get_contact(id)?
            .ok_or(ServiceError::ContactNotFound(id))
    }

    /// Lists contacts of one organization in chart input order.
    pub fn list_contacts(&self, org_id: OrganizationId) -> ServiceResult<Vec<Contact>> {
        self.ensure_organization(org_id)?;
        self.contacts.list_contacts(org_id).map_err(Into::into)
    }

    /// Hard-deletes one contact.
    ///
    /// Returns how many direct reports were left pointing at the removed
    /// contact.
    pub fn delete_contact(&self, id: ContactId) -> ServiceResult<usize> {
        let contact = self.get_contact(id)?;
        let orphaned = self
            .contacts
            .list_contacts(contact.org_id)?
            .iter()
            .filter(|other| other.id != id && other.parent_id == Some(id))
            .count();

        self.contacts
            .delete_contact(id)
            .map_err(|err| not_found_as(err, id))?;
        info!(
            "event=contact_delete module=service status=ok org={} node={id} orphaned={orphaned}",
            contact.org_id
        );
        Ok(orphaned)
    }

    /// Stores decoded CSV rows as contacts of `org_id`.
    ///
    /// Rows are processed in file order. `manager_email` resolves first to
    /// a contact created earlier in the same import, then to an existing
    /// contact of the organization; an unresolved manager leaves the row
    /// at root level. Row failures are collected, never raised.
    ///
    /// # Errors
    /// - `OrganizationNotFound` when `org_id` is unknown.
    pub fn import_rows(
        &self,
        org_id: OrganizationId,
        rows: Vec<CsvRow>,
    ) -> ServiceResult<ImportReport> {
        self.ensure_organization(org_id)?;
        info!(
            "event=contact_import module=service status=start org={org_id} rows={}",
            rows.len()
        );

        let mut report = ImportReport::default();
        let mut imported_by_email: HashMap<String, ContactId> = HashMap::new();
        let mut unresolved_managers = 0_usize;

        for row in rows {
            let record = match row.record {
                Ok(record) => record,
                Err(error) => {
                    report.errors.push(ImportRowError {
                        row: row.line,
                        error,
                    });
                    continue;
                }
            };

            let mut contact = record.to_contact(org_id);
            if let Some(manager_email) = record.manager_email() {
                contact.parent_id = match imported_by_email.get(&manager_email) {
                    Some(id) => Some(*id),
                    None => self
                        .contacts
                        .find_contact_by_email(org_id, &manager_email)?
                        .map(|manager| manager.id),
                };
                if contact.parent_id.is_none() {
                    unresolved_managers += 1;
                }
            }

            match self.create_contact(&contact) {
                Ok(stored) => {
                    if let Some(email) = stored.email.clone() {
                        imported_by_email.entry(email).or_insert(stored.id);
                    }
                    report.created.push(ImportedContact {
                        row: row.line,
                        id: stored.id,
                        email: stored.email,
                    });
                }
                Err(ServiceError::Repo(err)) => return Err(ServiceError::Repo(err)),
                Err(err) => report.errors.push(ImportRowError {
                    row: row.line,
                    error: err.to_string(),
                }),
            }
        }

        if unresolved_managers > 0 {
            warn!(
                "event=contact_import module=service status=ok org={org_id} unresolved_managers={unresolved_managers}"
            );
        }
        info!(
            "event=contact_import module=service status=ok org={org_id} created={} failed={}",
            report.created.len(),
            report.errors.len()
        );
        Ok(report)
    }

    fn ensure_organization(&self, org_id: OrganizationId) -> ServiceResult<()> {
        self.organizations
            .get_organization(org_id)?
            .map(|_| ())
            .ok_or(ServiceError::OrganizationNotFound(org_id))
    }

    fn ensure_parent(&self, contact: &Contact, parent_id: ContactId) -> ServiceResult<()> {
        if parent_id == contact.id {
            return Err(ServiceError::CycleDetected {
                contact_id: contact.id,
                parent_id,
            });
        }

        let parent = self
            .contacts
            .get_contact(parent_id)?
            .ok_or(ServiceError::ParentNotFound(parent_id))?;
        if parent.org_id != contact.org_id {
            return Err(ServiceError::ParentInOtherOrganization {
                contact_id: contact.id,
                parent_id,
            });
        }

        if self.would_create_cycle(contact.id, parent)? {
            return Err(ServiceError::CycleDetected {
                contact_id: contact.id,
                parent_id,
            });
        }
        Ok(())
    }

    /// Walks up from the candidate parent looking for `contact_id`.
    ///
    /// A dangling ancestor ends the walk: it can never lead back.
    fn would_create_cycle(
        &self,
        contact_id: ContactId,
        candidate_parent: Contact,
    ) -> ServiceResult<bool> {
        let mut visited = HashSet::new();
        let mut cursor = Some(candidate_parent);
        while let Some(current) = cursor {
            if current.id == contact_id {
                return Ok(true);
            }
            if !visited.insert(current.id) {
                // Stored cycle above the candidate that does not include
                // `contact_id`; attaching below it adds no new loop.
                return Ok(false);
            }
            cursor = match current.parent_id {
                Some(parent_id) => self.contacts.get_contact(parent_id)?,
                None => None,
            };
        }
        Ok(false)
    }
}

fn normalize(contact: &Contact) -> Contact {
    Contact {
        first_name: contact.first_name.trim().to_string(),
        last_name: contact.last_name.trim().to_string(),
        email: contact
            .email
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string),
        ..contact.clone()
    }
}

fn not_found_as(err: RepoError, id: ContactId) -> ServiceError {
    match err {
        RepoError::NotFound { .. } => ServiceError::ContactNotFound(id),
        other => other.into(),
    }
}
