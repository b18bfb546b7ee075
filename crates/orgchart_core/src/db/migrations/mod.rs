//! Schema steps for the org chart store.
//!
//! Step `0001` creates organizations and contacts. Step `0002` adds projects
//! and the contact/project assignment table. Both hang off `organizations`
//! with `ON DELETE CASCADE`, so dropping an organization clears its whole
//! account in one statement.
//!
//! # Invariants
//! - Step versions are strictly increasing and never renumbered.
//! - `PRAGMA user_version` equals the last step applied.
//! - Pending steps run in one transaction; a failing step applies nothing.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[
    SchemaStep {
        version: 1,
        name: "organizations_contacts",
        sql: include_str!("0001_organizations_contacts.sql"),
    },
    SchemaStep {
        version: 2,
        name: "projects",
        sql: include_str!("0002_projects.sql"),
    },
];

/// Schema version this binary writes.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Brings `conn` up to [`latest_version`].
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file was written by a newer build.
/// - `Sqlite` when a step fails; the file keeps its previous version.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from = current_user_version(conn)?;
    let latest = latest_version();
    if from > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: latest,
        });
    }

    let pending = pending_steps(from);
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in pending {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
        debug!(
            "event=db_migrate_step module=db status=ok version={} name={}",
            step.version, step.name
        );
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from_version={from} to_version={latest}");
    Ok(())
}

/// Reads `PRAGMA user_version`; a fresh file reports 0.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?)
}

fn pending_steps(from: u32) -> Vec<&'static SchemaStep> {
    SCHEMA_STEPS
        .iter()
        .filter(|step| step.version > from)
        .collect()
}
