//! Data exchange formats: JSON account brief and CSV contacts.
//!
//! # Responsibility
//! - Shape stored records into downloadable documents.
//! - Decode bulk contact input without touching storage.
//!
//! # See also
//! - `service::contact_service::ContactService::import_rows` for the
//!   storage side of CSV import.

pub mod brief;
pub mod csv;

use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TransferResult<T> = Result<T, TransferError>;

#[derive(Debug)]
pub enum TransferError {
    Csv(::csv::Error),
    Json(serde_json::Error),
    Io(std::io::Error),
}

impl Display for TransferError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv(err) => write!(f, "csv error: {err}"),
            Self::Json(err) => write!(f, "json error: {err}"),
            Self::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl Error for TransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Csv(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<::csv::Error> for TransferError {
    fn from(value: ::csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<serde_json::Error> for TransferError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<std::io::Error> for TransferError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
