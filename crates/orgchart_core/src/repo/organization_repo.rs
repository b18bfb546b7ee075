//! Organization repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Listing is ordered by `name ASC, id ASC`.
//! - Deleting an organization cascades to its contacts and projects.

use super::{parse_uuid, RepoError, RepoResult};
use crate::model::organization::{Organization, OrganizationId};
use rusqlite::{params, Connection, OptionalExtension, Row};

const ORGANIZATION_SELECT_SQL: &str = "SELECT
    id,
    name,
    industry,
    sector,
    location,
    notes
FROM organizations";

/// Repository interface for organization CRUD operations.
pub trait OrganizationRepository {
    fn create_organization(&self, organization: &Organization) -> RepoResult<OrganizationId>;
    fn update_organization(&self, organization: &Organization) -> RepoResult<()>;
    fn get_organization(&self, id: OrganizationId) -> RepoResult<Option<Organization>>;
    fn list_organizations(&self) -> RepoResult<Vec<Organization>>;
    fn delete_organization(&self, id: OrganizationId) -> RepoResult<()>;
}

/// SQLite-backed organization repository.
pub struct SqliteOrganizationRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteOrganizationRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl OrganizationRepository for SqliteOrganizationRepository<'_> {
    fn create_organization(&self, organization: &Organization) -> RepoResult<OrganizationId> {
        organization.validate()?;

        self.conn.execute(
            "INSERT INTO organizations (id, name, industry, sector, location, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                organization.id.to_string(),
                organization.name.as_str(),
                organization.industry.as_str(),
                organization.sector.as_deref(),
                organization.location.as_deref(),
                organization.notes.as_deref(),
            ],
        )?;
        Ok(organization.id)
    }

    fn update_organization(&self, organization: &Organization) -> RepoResult<()> {
        organization.validate()?;

        let changed = self.conn.execute(
            "UPDATE organizations
             SET
                name = ?1,
                industry = ?2,
                sector = ?3,
                location = ?4,
                notes = ?5,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?6;",
            params![
                organization.name.as_str(),
                organization.industry.as_str(),
                organization.sector.as_deref(),
                organization.location.as_deref(),
                organization.notes.as_deref(),
                organization.id.to_string(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "organization",
                id: organization.id,
            });
        }
        Ok(())
    }

    fn get_organization(&self, id: OrganizationId) -> RepoResult<Option<Organization>> {
        let row = self
            .conn
            .query_row(
                &format!("{ORGANIZATION_SELECT_SQL} WHERE id = ?1;"),
                [id.to_string()],
                |row| read_raw_organization(row),
            )
            .optional()?;
        row.map(RawOrganization::into_model).transpose()
    }

    fn list_organizations(&self) -> RepoResult<Vec<Organization>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ORGANIZATION_SELECT_SQL} ORDER BY name ASC, id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(read_raw_organization(row)?.into_model()?);
        }
        Ok(items)
    }

    fn delete_organization(&self, id: OrganizationId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM organizations WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "organization",
                id,
            });
        }
        Ok(())
    }
}

struct RawOrganization {
    id: String,
    name: String,
    industry: String,
    sector: Option<String>,
    location: Option<String>,
    notes: Option<String>,
}

impl RawOrganization {
    fn into_model(self) -> RepoResult<Organization> {
        Ok(Organization {
            id: parse_uuid(&self.id, "organizations.id")?,
            name: self.name,
            industry: self.industry,
            sector: self.sector,
            location: self.location,
            notes: self.notes,
        })
    }
}

fn read_raw_organization(row: &Row<'_>) -> rusqlite::Result<RawOrganization> {
    Ok(RawOrganization {
        id: row.get("id")?,
        name: row.get("name")?,
        industry: row.get("industry")?,
        sector: row.get("sector")?,
        location: row.get("location")?,
        notes: row.get("notes")?,
    })
}
