use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{lenient_default, null_as_default};

/// Root of the consolidated profiles document.
/// Both top-level keys are optional; absence reads as empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    #[serde(deserialize_with = "lenient_default")]
    pub metadata: Metadata,
    #[serde(deserialize_with = "null_as_default")]
    pub profiles: Vec<Profile>,
}

/// Descriptive counters written by the consolidation step.
/// Never checked against the profile list; a value of the wrong type reads as the default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    #[serde(deserialize_with = "lenient_default")]
    pub total_unique_profiles: u64,
    #[serde(deserialize_with = "lenient_default")]
    pub total_evidence_items: u64,
    #[serde(deserialize_with = "lenient_default")]
    pub source_files: u64,
    #[serde(deserialize_with = "lenient_default")]
    pub profiles_merged: u64,
    #[serde(deserialize_with = "lenient_default")]
    pub duplicate_evidence_removed: u64,
    #[serde(
        deserialize_with = "lenient_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub generated_at: Option<String>,
    /// Keys this service does not interpret, passed through untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Profile {
    /// Acts as the profile identifier. Uniqueness is not enforced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub roles: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
    /// Stored count. Trusted as-is even when it disagrees with `evidence.len()`.
    #[serde(deserialize_with = "null_as_default")]
    pub evidence_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_evidence_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_evidence_date: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub evidence: Vec<Evidence>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Evidence {
    /// Expected `YYYY-MM-DD`, but may be malformed or missing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tweet_url: Option<String>,
}

impl Profile {
    pub fn username_or_empty(&self) -> &str {
        self.username.as_deref().unwrap_or("")
    }

    pub fn latest_date_or_empty(&self) -> &str {
        self.latest_evidence_date.as_deref().unwrap_or("")
    }
}
