use serde::Serialize;

use crate::models::dataset::{Document, Profile};

/// Single-level view of a profile used for filtering, sorting and aggregation.
/// All field defaulting for the tabular views happens here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlatRow {
    pub username: String,
    pub full_name: String,
    pub roles: String,
    pub company: String,
    pub company_size: String,
    pub evidence_count: u64,
    pub first_date: String,
    pub latest_date: String,
}

impl From<&Profile> for FlatRow {
    fn from(profile: &Profile) -> Self {
        let text = |field: &Option<String>| field.clone().unwrap_or_default();
        Self {
            username: text(&profile.username),
            full_name: text(&profile.full_name),
            roles: profile.roles.join(", "),
            company: text(&profile.company),
            company_size: text(&profile.company_size),
            evidence_count: profile.evidence_count,
            first_date: text(&profile.first_evidence_date),
            latest_date: text(&profile.latest_evidence_date),
        }
    }
}

/// One row per profile, in document order.
pub fn project_rows(document: &Document) -> Vec<FlatRow> {
    document.profiles.iter().map(FlatRow::from).collect()
}
