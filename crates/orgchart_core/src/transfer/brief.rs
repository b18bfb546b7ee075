//! Account brief: one organization exported as a single JSON document.

use super::TransferResult;
use crate::hierarchy::{build_forest, HierarchyNode};
use crate::model::contact::Contact;
use crate::model::organization::Organization;
use crate::model::project::Project;
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// Contact row of a brief, with the display name precomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BriefContact {
    #[serde(flatten)]
    pub contact: Contact,
    pub full_name: String,
}

/// Downloadable snapshot of one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountBrief {
    pub organization: Organization,
    pub contacts: Vec<BriefContact>,
    pub projects: Vec<Project>,
    /// Unix epoch milliseconds.
    pub exported_at: i64,
    pub hierarchy: Vec<HierarchyNode>,
}

impl AccountBrief {
    /// Assembles a brief; `hierarchy` is built from `contacts` as given.
    pub fn new(
        organization: Organization,
        contacts: Vec<Contact>,
        projects: Vec<Project>,
        exported_at: i64,
    ) -> Self {
        let hierarchy = build_forest(&contacts).to_tree();
        let contacts = contacts
            .into_iter()
            .map(|contact| BriefContact {
                full_name: contact.full_name(),
                contact,
            })
            .collect();
        Self {
            organization,
            contacts,
            projects,
            exported_at,
            hierarchy,
        }
    }

    pub fn to_json_pretty(&self) -> TransferResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// File name offered for download, e.g. `Acme_Energy_org_chart.json`.
    pub fn file_name(&self) -> String {
        let stem = self
            .organization
            .name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_");
        format!("{stem}_org_chart.json")
    }
}

/// Current time as Unix epoch milliseconds; 0 if the clock is before 1970.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}

#[cfg(test)]
mod tests {
    use super::AccountBrief;
    use crate::model::contact::Contact;
    use crate::model::organization::Organization;
    use serde_json::Value;

    #[test]
    fn brief_json_nests_hierarchy_under_subordinates() {
        let org = Organization::new("Gulf  Coast LNG", "LNG");
        let boss = Contact::new(org.id, "Maria", "Santos");
        let mut report = Contact::new(org.id, "Tom", "Nguyen");
        report.parent_id = Some(boss.id);

        let brief = AccountBrief::new(org.clone(), vec![boss.clone(), report.clone()], vec![], 42);
        let value: Value = serde_json::from_str(&brief.to_json_pretty().unwrap()).unwrap();

        assert_eq!(value["organization"]["name"], "Gulf  Coast LNG");
        assert_eq!(value["exported_at"], 42);
        assert_eq!(value["contacts"][1]["full_name"], "Tom Nguyen");
        assert_eq!(value["hierarchy"].as_array().unwrap().len(), 1);
        assert_eq!(
            value["hierarchy"][0]["subordinates"][0]["id"],
            report.id.to_string()
        );
        assert_eq!(brief.file_name(), "Gulf_Coast_LNG_org_chart.json");
    }
}
