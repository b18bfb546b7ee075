//! Person search query building and response mapping.
//!
//! # Invariants
//! - A company domain takes precedence over a company name.
//! - Backslashes and quotes inside values are escaped, so quoted values
//!   never break out of their quotes.
//! - A request without criteria still yields a valid, narrow query.

use super::{EnrichError, EnrichResult};
use crate::model::contact::Contact;
use crate::model::organization::OrganizationId;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

pub const DEFAULT_SEARCH_SIZE: u32 = 10;
pub const MAX_SEARCH_SIZE: u32 = 25;

/// Environment variables checked for the provider key, in order.
pub const API_KEY_ENV_CANDIDATES: [&str; 7] = [
    "PDL_API_KEY",
    "PEOPLE_DATA_LABS_API_KEY",
    "PEOPLE_DATA_LAB_API_KEY",
    "PEOPLEDATALABS_API_KEY",
    "PEOPLE_DATALABS_API_KEY",
    "PDL_KEY",
    "PDLAPIKEY",
];

const FALLBACK_QUERY: &str = r#"SELECT * FROM person WHERE job_title:"manager""#;
const CANDIDATE_SOURCE: &str = "pdl";

/// Search criteria. Blank fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeopleSearchRequest {
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub company_domain: Option<String>,
    pub title: Option<String>,
    pub seniority: Option<String>,
    pub location: Option<String>,
    /// Requested result count; see [`search_size`].
    pub limit: Option<u32>,
}

/// Builds the provider SQL query for `request`.
pub fn build_search_sql(request: &PeopleSearchRequest) -> String {
    let mut conditions = Vec::new();
    match (present(&request.company_domain), present(&request.company)) {
        (Some(domain), _) => conditions.push(condition("job_company_website", domain)),
        (None, Some(company)) => conditions.push(condition("job_company_name", company)),
        (None, None) => {}
    }
    let fields = [
        ("job_title", &request.title),
        ("job_title_levels", &request.seniority),
        ("location_name", &request.location),
        ("full_name", &request.name),
        ("first_name", &request.first_name),
        ("last_name", &request.last_name),
    ];
    for (field, value) in fields {
        if let Some(value) = present(value) {
            conditions.push(condition(field, value));
        }
    }

    if conditions.is_empty() {
        return FALLBACK_QUERY.to_string();
    }
    format!("SELECT * FROM person WHERE {}", conditions.join(" AND "))
}

/// Result count clamped to `1..=MAX_SEARCH_SIZE`; unset or zero means
/// [`DEFAULT_SEARCH_SIZE`].
pub fn search_size(limit: Option<u32>) -> u32 {
    match limit {
        None | Some(0) => DEFAULT_SEARCH_SIZE,
        Some(value) => value.clamp(1, MAX_SEARCH_SIZE),
    }
}

/// JSON body for the provider's person search endpoint.
pub fn search_body(request: &PeopleSearchRequest) -> Value {
    let sql = build_search_sql(request);
    let size = search_size(request.limit);
    debug!("event=people_search_body module=enrich status=ok size={size}");
    json!({ "sql": sql, "size": size, "pretty": true })
}

fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn condition(field: &str, value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("{field}:\"{escaped}\"")
}

/// One person returned by the provider, normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PersonCandidate {
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub company: Option<String>,
    pub company_domain: Option<String>,
    pub source: &'static str,
}

impl PersonCandidate {
    /// Contact draft for `org_id`, at root level with level 0.
    ///
    /// The draft is not validated; names may be blank.
    pub fn to_contact(&self, org_id: OrganizationId) -> Contact {
        let mut contact = Contact::new(org_id, self.first_name.clone(), self.last_name.clone());
        contact.title = self.title.clone();
        contact.email = self.email.clone();
        contact.phone = self.phone.clone();
        contact.location = self.location.clone();
        contact
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchResponse {
    pub total: u64,
    pub results: Vec<PersonCandidate>,
}

/// Parses and maps a raw provider response body.
pub fn parse_search_response(body: &str) -> EnrichResult<SearchResponse> {
    let value: Value = serde_json::from_str(body)?;
    map_search_response(&value)
}

/// Maps a provider response document.
///
/// A missing `data` array maps to no results; `total` falls back to the
/// number of mapped results.
///
/// # Errors
/// - `InvalidResponse` when the document or `data` has the wrong shape.
pub fn map_search_response(value: &Value) -> EnrichResult<SearchResponse> {
    let document = value
        .as_object()
        .ok_or(EnrichError::InvalidResponse("expected a JSON object"))?;
    let results = match document.get("data") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(people)) => people
            .iter()
            .filter_map(Value::as_object)
            .map(map_person)
            .collect(),
        Some(_) => return Err(EnrichError::InvalidResponse("`data` is not an array")),
    };
    let total = document
        .get("total")
        .and_then(Value::as_u64)
        .filter(|total| *total > 0)
        .unwrap_or(results.len() as u64);

    debug!(
        "event=people_search_map module=enrich status=ok total={total} results={}",
        results.len()
    );
    Ok(SearchResponse { total, results })
}

fn map_person(person: &Map<String, Value>) -> PersonCandidate {
    let first_name = text(person, "first_name").unwrap_or_default();
    let last_name = text(person, "last_name").unwrap_or_default();
    let full_name = text(person, "full_name")
        .unwrap_or_else(|| format!("{first_name} {last_name}").trim().to_string());

    let email = text(person, "work_email").or_else(|| {
        first_entry(person, "emails").and_then(|entry| entry_text(entry, "address"))
    });
    let phone = first_entry(person, "phone_numbers").and_then(|entry| entry_text(entry, "number"));

    PersonCandidate {
        first_name,
        last_name,
        full_name,
        title: text(person, "job_title").or_else(|| text(person, "title")),
        email,
        phone,
        location: text(person, "location_name").or_else(|| text(person, "location")),
        company: text(person, "job_company_name").or_else(|| text(person, "company")),
        company_domain: text(person, "job_company_domain")
            .or_else(|| text(person, "job_company_website")),
        source: CANDIDATE_SOURCE,
    }
}

fn text(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn first_entry<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get(key).and_then(Value::as_array)?.first()
}

/// Entry given either as a bare string or as an object holding `key`.
fn entry_text(entry: &Value, key: &str) -> Option<String> {
    match entry {
        Value::String(value) => Some(value.clone()),
        Value::Object(object) => text(object, key),
        _ => None,
    }
    .filter(|value| !value.is_empty())
}

/// Provider API key plus the variable it was read from.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey {
    pub value: String,
    pub source: &'static str,
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKey")
            .field("value", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

/// Returns the first non-empty candidate variable reported by `lookup`.
pub fn api_key_from(lookup: impl Fn(&str) -> Option<String>) -> Option<ApiKey> {
    API_KEY_ENV_CANDIDATES.iter().find_map(|name| {
        lookup(name)
            .filter(|value| !value.trim().is_empty())
            .map(|value| ApiKey {
                value,
                source: *name,
            })
    })
}

/// [`api_key_from`] over the process environment.
pub fn api_key_from_env() -> Option<ApiKey> {
    api_key_from(|name| std::env::var(name).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn empty_request_falls_back_to_managers() {
        assert_eq!(
            build_search_sql(&PeopleSearchRequest::default()),
            r#"SELECT * FROM person WHERE job_title:"manager""#
        );
    }

    #[test]
    fn domain_wins_over_company_and_quotes_are_escaped() {
        let request = PeopleSearchRequest {
            company: Some("Acme".to_string()),
            company_domain: Some("acme.com".to_string()),
            title: Some(r#"VP "Ops""#.to_string()),
            last_name: Some("  ".to_string()),
            ..PeopleSearchRequest::default()
        };
        assert_eq!(
            build_search_sql(&request),
            r#"SELECT * FROM person WHERE job_company_website:"acme.com" AND job_title:"VP \"Ops\"""#
        );
    }

    #[test]
    fn trailing_backslash_stays_inside_its_quotes() {
        let request = PeopleSearchRequest {
            title: Some(r"VP\".to_string()),
            location: Some("x".to_string()),
            ..PeopleSearchRequest::default()
        };
        assert_eq!(
            build_search_sql(&request),
            r#"SELECT * FROM person WHERE job_title:"VP\\" AND location_name:"x""#
        );

        let request = PeopleSearchRequest {
            name: Some(r#"a\" OR x:"y"#.to_string()),
            ..PeopleSearchRequest::default()
        };
        assert_eq!(
            build_search_sql(&request),
            r#"SELECT * FROM person WHERE full_name:"a\\\" OR x:\"y""#
        );
    }

    #[test]
    fn size_is_clamped() {
        assert_eq!(search_size(None), 10);
        assert_eq!(search_size(Some(0)), 10);
        assert_eq!(search_size(Some(3)), 3);
        assert_eq!(search_size(Some(500)), 25);

        let body = search_body(&PeopleSearchRequest {
            limit: Some(40),
            ..PeopleSearchRequest::default()
        });
        assert_eq!(body["size"], 25);
        assert_eq!(body["pretty"], true);
    }

    #[test]
    fn maps_email_and_phone_shapes() {
        let response = json!({
            "total": 120,
            "data": [
                {
                    "first_name": "Rosa",
                    "last_name": "Diaz",
                    "emails": [{ "address": "rosa@plant.example" }],
                    "phone_numbers": ["+1 555 0100"],
                    "title": "Plant Manager",
                    "job_company_website": "plant.example"
                },
                {
                    "full_name": "Lee Park",
                    "work_email": "lee@refinery.example",
                    "emails": ["other@example.com"],
                    "phone_numbers": [{ "number": "+1 555 0101" }],
                    "job_title": "Turnaround Lead",
                    "location_name": "Houston, Texas"
                }
            ]
        });
        let mapped = map_search_response(&response).unwrap();
        assert_eq!(mapped.total, 120);

        let rosa = &mapped.results[0];
        assert_eq!(rosa.full_name, "Rosa Diaz");
        assert_eq!(rosa.email.as_deref(), Some("rosa@plant.example"));
        assert_eq!(rosa.phone.as_deref(), Some("+1 555 0100"));
        assert_eq!(rosa.title.as_deref(), Some("Plant Manager"));
        assert_eq!(rosa.company_domain.as_deref(), Some("plant.example"));
        assert_eq!(rosa.source, "pdl");

        let lee = &mapped.results[1];
        assert_eq!(lee.email.as_deref(), Some("lee@refinery.example"));
        assert_eq!(lee.phone.as_deref(), Some("+1 555 0101"));
        assert_eq!(lee.location.as_deref(), Some("Houston, Texas"));
        assert_eq!(lee.first_name, "");
    }

    #[test]
    fn missing_data_and_total_fall_back() {
        let mapped = map_search_response(&json!({})).unwrap();
        assert_eq!(mapped.total, 0);
        assert!(mapped.results.is_empty());

        let mapped = map_search_response(&json!({ "data": [{ "first_name": "A" }] })).unwrap();
        assert_eq!(mapped.total, 1);

        assert!(map_search_response(&json!({ "data": "nope" })).is_err());
        assert!(parse_search_response("not json").is_err());
    }

    #[test]
    fn candidate_becomes_root_contact_draft() {
        let org = Uuid::new_v4();
        let candidate = PersonCandidate {
            first_name: "Rosa".to_string(),
            last_name: "Diaz".to_string(),
            email: Some("rosa@plant.example".to_string()),
            source: "pdl",
            ..PersonCandidate::default()
        };
        let contact = candidate.to_contact(org);
        assert_eq!(contact.org_id, org);
        assert!(contact.parent_id.is_none());
        assert_eq!(contact.level, 0);
        assert!(contact.validate().is_ok());
    }

    #[test]
    fn api_key_lookup_reports_first_set_source() {
        let key = api_key_from(|name| match name {
            "PDL_API_KEY" => Some(" ".to_string()),
            "PDL_KEY" => Some("secret".to_string()),
            "PDLAPIKEY" => Some("later".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(key.value, "secret");
        assert_eq!(key.source, "PDL_KEY");
        assert!(!format!("{key:?}").contains("secret"));

        assert!(api_key_from(|_| None).is_none());
    }
}
