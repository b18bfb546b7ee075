//! Contact repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over the `contacts` table.
//! - Return one organization's contacts in chart input order.
//!
//! # Invariants
//! - Organization listing is ordered by `level ASC, last_name ASC, id ASC`.
//! - Deleting a contact never touches its reports; their `parent_id` keeps
//!   pointing at the removed row.
//! - Reads never fail on an out-of-range stored `level`; it is clamped to
//!   `0..=MAX_CONTACT_LEVEL` and logged.

use super::{parse_uuid, RepoError, RepoResult};
use crate::model::contact::{Contact, ContactId, MAX_CONTACT_LEVEL};
use crate::model::organization::OrganizationId;
use log::warn;
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

const CONTACT_SELECT_SQL: &str = "SELECT
    id,
    org_id,
    first_name,
    last_name,
    title,
    department,
    email,
    phone,
    location,
    parent_id,
    level,
    responsibilities,
    project_types,
    notes
FROM contacts";

/// Repository interface for contact CRUD operations.
pub trait ContactRepository {
    fn create_contact(&self, contact: &Contact) -> RepoResult<ContactId>;
    fn update_contact(&self, contact: &Contact) -> RepoResult<()>;
    fn get_contact(&self, id: ContactId) -> RepoResult<Option<Contact>>;
    /// Lists every contact of one organization in chart input order.
    fn list_contacts(&self, org_id: OrganizationId) -> RepoResult<Vec<Contact>>;
    /// Finds a contact by exact email within one organization.
    fn find_contact_by_email(
        &self,
        org_id: OrganizationId,
        email: &str,
    ) -> RepoResult<Option<Contact>>;
    fn delete_contact(&self, id: ContactId) -> RepoResult<()>;
}

/// SQLite-backed contact repository.
pub struct SqliteContactRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteContactRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ContactRepository for SqliteContactRepository<'_> {
    fn create_contact(&self, contact: &Contact) -> RepoResult<ContactId> {
        contact.validate()?;

        self.conn.execute(
            "INSERT INTO contacts (
                id,
                org_id,
                first_name,
                last_name,
                title,
                department,
                email,
                phone,
                location,
                parent_id,
                level,
                responsibilities,
                project_types,
                notes
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14);",
            params![
                contact.id.to_string(),
                contact.org_id.to_string(),
                contact.first_name.as_str(),
                contact.last_name.as_str(),
                contact.title.as_deref(),
                contact.department.as_deref(),
                contact.email.as_deref(),
                contact.phone.as_deref(),
                contact.location.as_deref(),
                contact.parent_id.map(|value| value.to_string()),
                i64::from(contact.level),
                contact.responsibilities.as_deref(),
                contact.project_types.as_deref(),
                contact.notes.as_deref(),
            ],
        )?;

        Ok(contact.id)
    }

    fn update_contact(&self, contact: &Contact) -> RepoResult<()> {
        contact.validate()?;

        let changed = self.conn.execute(
            "UPDATE contacts
             SET
                first_name = ?1,
                last_name = ?2,
                title = ?3,
                department = ?4,
                email = ?5,
                phone = ?6,
                location = ?7,
                parent_id = ?8,
                level = ?9,
                responsibilities = ?10,
                project_types = ?11,
                notes = ?12,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?13;",
            params![
                contact.first_name.as_str(),
                contact.last_name.as_str(),
                contact.title.as_deref(),
                contact.department.as_deref(),
                contact.email.as_deref(),
                contact.phone.as_deref(),
                contact.location.as_deref(),
                contact.parent_id.map(|value| value.to_string()),
                i64::from(contact.level),
                contact.responsibilities.as_deref(),
                contact.project_types.as_deref(),
                contact.notes.as_deref(),
                contact.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "contact",
                id: contact.id,
            });
        }
        Ok(())
    }

    fn get_contact(&self, id: ContactId) -> RepoResult<Option<Contact>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CONTACT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_contact_row(row)?));
        }
        Ok(None)
    }

    fn list_contacts(&self, org_id: OrganizationId) -> RepoResult<Vec<Contact>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CONTACT_SELECT_SQL}
             WHERE org_id = ?1
             ORDER BY level ASC, last_name ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([org_id.to_string()])?;
        let mut contacts = Vec::new();
        while let Some(row) = rows.next()? {
            contacts.push(parse_contact_row(row)?);
        }
        Ok(contacts)
    }

    fn find_contact_by_email(
        &self,
        org_id: OrganizationId,
        email: &str,
    ) -> RepoResult<Option<Contact>> {
        let id: Option<String> = self
            .conn
            .query_row(
                "SELECT id
                 FROM contacts
                 WHERE org_id = ?1
                   AND email = ?2
                 ORDER BY created_at ASC, id ASC
                 LIMIT 1;",
                params![org_id.to_string(), email],
                |row| row.get(0),
            )
            .optional()?;

        match id {
            Some(id) => self.get_contact(parse_uuid(&id, "contacts.id")?),
            None => Ok(None),
        }
    }

    fn delete_contact(&self, id: ContactId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM contacts WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "contact",
                id,
            });
        }
        Ok(())
    }
}

fn parse_contact_row(row: &Row<'_>) -> RepoResult<Contact> {
    let id_text: String = row.get("id")?;
    let id = parse_uuid(&id_text, "contacts.id")?;
    let org_id_text: String = row.get("org_id")?;
    let org_id = parse_uuid(&org_id_text, "contacts.org_id")?;

    // A parent reference that is not a UUID can never resolve to a contact;
    // it degrades to "reports to nobody" like any other dangling reference.
    let parent_id = row
        .get::<_, Option<String>>("parent_id")?
        .filter(|value| !value.is_empty())
        .and_then(|value| match Uuid::parse_str(&value) {
            Ok(parent) => Some(parent),
            Err(_) => {
                warn!(
                    "event=contact_read module=repo status=ok node={id} parent_ref=unparseable"
                );
                None
            }
        });

    let stored_level: i64 = row.get("level")?;
    let level = clamp_level(stored_level);
    if i64::from(level) != stored_level {
        warn!(
            "event=contact_read module=repo status=ok node={id} level_clamped_to={level}"
        );
    }

    Ok(Contact {
        id,
        org_id,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        title: row.get("title")?,
        department: row.get("department")?,
        email: row.get("email")?,
        phone: row.get("phone")?,
        location: row.get("location")?,
        parent_id,
        level,
        responsibilities: row.get("responsibilities")?,
        project_types: row.get("project_types")?,
        notes: row.get("notes")?,
    })
}

/// Out-of-range stored levels read as the nearest valid level.
fn clamp_level(stored: i64) -> u8 {
    stored.clamp(0, i64::from(MAX_CONTACT_LEVEL)) as u8
}

#[cfg(test)]
mod tests {
    use super::clamp_level;

    #[test]
    fn stored_level_is_clamped_into_range() {
        assert_eq!(clamp_level(3), 3);
        assert_eq!(clamp_level(7), 4);
        assert_eq!(clamp_level(-2), 0);
        assert_eq!(clamp_level(i64::MAX), 4);
    }
}
