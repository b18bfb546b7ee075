//! Project repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Organization listing is ordered by `start_date DESC, id ASC`.
//! - A contact is assigned to a project at most once; re-assigning
//!   replaces the role.

use super::{parse_uuid, RepoError, RepoResult};
use crate::model::contact::ContactId;
use crate::model::organization::OrganizationId;
use crate::model::project::{Project, ProjectAssignment, ProjectId};
use rusqlite::{params, Connection, Row};

const PROJECT_SELECT_SQL: &str = "SELECT
    id,
    org_id,
    name,
    type,
    status,
    description,
    start_date,
    end_date
FROM projects";

/// Repository interface for projects and contact assignments.
pub trait ProjectRepository {
    fn create_project(&self, project: &Project) -> RepoResult<ProjectId>;
    fn update_project(&self, project: &Project) -> RepoResult<()>;
    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>>;
    fn list_projects(&self, org_id: OrganizationId) -> RepoResult<Vec<Project>>;
    fn delete_project(&self, id: ProjectId) -> RepoResult<()>;
    fn assign_contact(&self, assignment: &ProjectAssignment) -> RepoResult<()>;
    fn unassign_contact(&self, contact_id: ContactId, project_id: ProjectId) -> RepoResult<()>;
    fn list_assignments(&self, project_id: ProjectId) -> RepoResult<Vec<ProjectAssignment>>;
}

/// SQLite-backed project repository.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn create_project(&self, project: &Project) -> RepoResult<ProjectId> {
        ensure_project_name(project)?;

        self.conn.execute(
            "INSERT INTO projects (
                id,
                org_id,
                name,
                type,
                status,
                description,
                start_date,
                end_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                project.id.to_string(),
                project.org_id.to_string(),
                project.name.as_str(),
                project.kind.as_deref(),
                project.status.as_deref(),
                project.description.as_deref(),
                project.start_date.as_deref(),
                project.end_date.as_deref(),
            ],
        )?;
        Ok(project.id)
    }

    fn update_project(&self, project: &Project) -> RepoResult<()> {
        ensure_project_name(project)?;

        let changed = self.conn.execute(
            "UPDATE projects
             SET
                name = ?1,
                type = ?2,
                status = ?3,
                description = ?4,
                start_date = ?5,
                end_date = ?6
             WHERE id = ?7;",
            params![
                project.name.as_str(),
                project.kind.as_deref(),
                project.status.as_deref(),
                project.description.as_deref(),
                project.start_date.as_deref(),
                project.end_date.as_deref(),
                project.id.to_string(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "project",
                id: project.id,
            });
        }
        Ok(())
    }

    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROJECT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_project_row(row)?));
        }
        Ok(None)
    }

    fn list_projects(&self, org_id: OrganizationId) -> RepoResult<Vec<Project>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PROJECT_SELECT_SQL}
             WHERE org_id = ?1
             ORDER BY start_date DESC, id ASC;"
        ))?;
        let mut rows = stmt.query([org_id.to_string()])?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next()? {
            projects.push(parse_project_row(row)?);
        }
        Ok(projects)
    }

    fn delete_project(&self, id: ProjectId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM projects WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "project",
                id,
            });
        }
        Ok(())
    }

    fn assign_contact(&self, assignment: &ProjectAssignment) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO contact_projects (contact_id, project_id, role)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (contact_id, project_id) DO UPDATE SET role = excluded.role;",
            params![
                assignment.contact_id.to_string(),
                assignment.project_id.to_string(),
                assignment.role.as_deref(),
            ],
        )?;
        Ok(())
    }

    fn unassign_contact(&self, contact_id: ContactId, project_id: ProjectId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM contact_projects WHERE contact_id = ?1 AND project_id = ?2;",
            params![contact_id.to_string(), project_id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "project assignment",
                id: contact_id,
            });
        }
        Ok(())
    }

    fn list_assignments(&self, project_id: ProjectId) -> RepoResult<Vec<ProjectAssignment>> {
        let mut stmt = self.conn.prepare(
            "SELECT contact_id, project_id, role
             FROM contact_projects
             WHERE project_id = ?1
             ORDER BY contact_id ASC;",
        )?;
        let mut rows = stmt.query([project_id.to_string()])?;
        let mut assignments = Vec::new();
        while let Some(row) = rows.next()? {
            let contact_id: String = row.get("contact_id")?;
            let project_id: String = row.get("project_id")?;
            assignments.push(ProjectAssignment {
                contact_id: parse_uuid(&contact_id, "contact_projects.contact_id")?,
                project_id: parse_uuid(&project_id, "contact_projects.project_id")?,
                role: row.get("role")?,
            });
        }
        Ok(assignments)
    }
}

fn ensure_project_name(project: &Project) -> RepoResult<()> {
    if project.name.trim().is_empty() {
        return Err(RepoError::InvalidData(
            "project name must not be blank".to_string(),
        ));
    }
    Ok(())
}

fn parse_project_row(row: &Row<'_>) -> RepoResult<Project> {
    let id: String = row.get("id")?;
    let org_id: String = row.get("org_id")?;
    Ok(Project {
        id: parse_uuid(&id, "projects.id")?,
        org_id: parse_uuid(&org_id, "projects.org_id")?,
        name: row.get("name")?,
        kind: row.get("type")?,
        status: row.get("status")?,
        description: row.get("description")?,
        start_date: row.get("start_date")?,
        end_date: row.get("end_date")?,
    })
}
