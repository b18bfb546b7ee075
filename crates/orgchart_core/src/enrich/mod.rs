//! People-data enrichment mapping.
//!
//! # Responsibility
//! - Translate contact search criteria into the provider's query body.
//! - Map provider person records into contact drafts.
//! - Locate the provider API key in the environment.
//!
//! Network transport is left to the caller; nothing here performs I/O
//! beyond reading environment variables.

pub mod people_search;

pub use people_search::{
    api_key_from, api_key_from_env, build_search_sql, map_search_response,
    parse_search_response, search_body, search_size, ApiKey, PeopleSearchRequest,
    PersonCandidate, SearchResponse, API_KEY_ENV_CANDIDATES, DEFAULT_SEARCH_SIZE,
    MAX_SEARCH_SIZE,
};

use std::error::Error;
use std::fmt::{Display, Formatter};

pub type EnrichResult<T> = Result<T, EnrichError>;

#[derive(Debug)]
pub enum EnrichError {
    /// Response body is not shaped like a person search result.
    InvalidResponse(&'static str),
    Json(serde_json::Error),
}

impl Display for EnrichError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidResponse(detail) => write!(f, "invalid search response: {detail}"),
            Self::Json(err) => write!(f, "invalid search response json: {err}"),
        }
    }
}

impl Error for EnrichError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::InvalidResponse(_) => None,
        }
    }
}

impl From<serde_json::Error> for EnrichError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
