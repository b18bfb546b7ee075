//! CSV contact import/export.
//!
//! # Responsibility
//! - Decode contact rows from CSV with per-row error capture.
//! - Encode one organization's contacts as CSV, reporting links included.
//!
//! # Invariants
//! - A malformed row never aborts reading; it is reported with its line.
//! - Line numbers are 1-based with the header on line 1.

use super::{TransferError, TransferResult};
use crate::model::contact::{Contact, ContactId};
use crate::model::organization::OrganizationId;
use csv::{ReaderBuilder, Trim, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// One decoded import row.
///
/// Every column is optional at decode time; required fields are enforced
/// by contact validation so the error names the missing field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContactCsvRecord {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub title: Option<String>,
    pub department: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub level: Option<String>,
    pub responsibilities: Option<String>,
    pub project_types: Option<String>,
    pub notes: Option<String>,
    /// Email of the manager, resolved within the target organization.
    pub manager_email: Option<String>,
}

impl ContactCsvRecord {
    /// Builds a root-level contact for `org_id` from this row.
    ///
    /// Unparseable `level` values fall back to 0.
    pub fn to_contact(&self, org_id: OrganizationId) -> Contact {
        let mut contact = Contact::new(
            org_id,
            self.first_name.clone().unwrap_or_default(),
            self.last_name.clone().unwrap_or_default(),
        );
        contact.title = non_empty(&self.title);
        contact.department = non_empty(&self.department);
        contact.email = non_empty(&self.email);
        contact.phone = non_empty(&self.phone);
        contact.location = non_empty(&self.location);
        contact.level = self
            .level
            .as_deref()
            .and_then(|value| value.trim().parse::<u8>().ok())
            .unwrap_or(0);
        contact.responsibilities = non_empty(&self.responsibilities);
        contact.project_types = non_empty(&self.project_types);
        contact.notes = non_empty(&self.notes);
        contact
    }

    pub fn manager_email(&self) -> Option<String> {
        non_empty(&self.manager_email)
    }
}

/// A decoded row or the reason it could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    pub line: u64,
    pub record: Result<ContactCsvRecord, String>,
}

/// Reads every data row of a contact CSV.
///
/// # Errors
/// - `TransferError::Csv` when the header line itself cannot be read.
pub fn read_contact_csv(input: impl Read) -> TransferResult<Vec<CsvRow>> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(input);
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let fallback_line = index as u64 + 2;
        let row = match result {
            Ok(record) => CsvRow {
                line: record.position().map_or(fallback_line, |pos| pos.line()),
                record: record
                    .deserialize::<ContactCsvRecord>(Some(&headers))
                    .map_err(|err| err.to_string()),
            },
            Err(err) => CsvRow {
                line: err
                    .position()
                    .map_or(fallback_line, |pos| pos.line()),
                record: Err(err.to_string()),
            },
        };
        rows.push(row);
    }
    Ok(rows)
}

#[derive(Debug, Serialize)]
struct ContactCsvOutRecord<'a> {
    id: ContactId,
    parent_id: Option<ContactId>,
    first_name: &'a str,
    last_name: &'a str,
    title: Option<&'a str>,
    department: Option<&'a str>,
    email: Option<&'a str>,
    phone: Option<&'a str>,
    location: Option<&'a str>,
    level: u8,
    responsibilities: Option<&'a str>,
    project_types: Option<&'a str>,
    notes: Option<&'a str>,
}

const EXPORT_HEADERS: [&str; 13] = [
    "id",
    "parent_id",
    "first_name",
    "last_name",
    "title",
    "department",
    "email",
    "phone",
    "location",
    "level",
    "responsibilities",
    "project_types",
    "notes",
];

/// Writes contacts as CSV. The header row is written even with no contacts.
pub fn write_contact_csv(output: impl Write, contacts: &[Contact]) -> TransferResult<()> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(output);
    writer.write_record(EXPORT_HEADERS)?;
    for contact in contacts {
        writer.serialize(ContactCsvOutRecord {
            id: contact.id,
            parent_id: contact.parent_id,
            first_name: &contact.first_name,
            last_name: &contact.last_name,
            title: contact.title.as_deref(),
            department: contact.department.as_deref(),
            email: contact.email.as_deref(),
            phone: contact.phone.as_deref(),
            location: contact.location.as_deref(),
            level: contact.level,
            responsibilities: contact.responsibilities.as_deref(),
            project_types: contact.project_types.as_deref(),
            notes: contact.notes.as_deref(),
        })?;
    }
    writer.flush().map_err(TransferError::Io)?;
    Ok(())
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Outcome of one CSV import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub created: Vec<ImportedContact>,
    pub errors: Vec<ImportRowError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportedContact {
    pub row: u64,
    pub id: ContactId,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportRowError {
    pub row: u64,
    pub error: String,
}
