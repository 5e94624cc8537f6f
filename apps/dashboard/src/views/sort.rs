use serde::{Deserialize, Serialize};

use crate::models::dataset::Profile;

/// Orderings offered by the profile list. All of them are stable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    EvidenceDesc,
    EvidenceAsc,
    UsernameAsc,
    LatestActivity,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::EvidenceDesc,
        SortKey::EvidenceAsc,
        SortKey::UsernameAsc,
        SortKey::LatestActivity,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            SortKey::EvidenceDesc => "evidence_desc",
            SortKey::EvidenceAsc => "evidence_asc",
            SortKey::UsernameAsc => "username_asc",
            SortKey::LatestActivity => "latest_activity",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::EvidenceDesc => "Evidence Count (High to Low)",
            SortKey::EvidenceAsc => "Evidence Count (Low to High)",
            SortKey::UsernameAsc => "Username (A-Z)",
            SortKey::LatestActivity => "Latest Activity",
        }
    }

    /// Accepts either the display label or the snake_case id.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|key| key.id() == value || key.label() == value)
    }
}

/// Reorders the filtered subset in place. `None` leaves it untouched.
pub fn sort_profiles(profiles: &mut [&Profile], key: Option<SortKey>) {
    let Some(key) = key else {
        return;
    };
    // Slice sorts are stable; a reversed comparator keeps ties in input order.
    match key {
        SortKey::EvidenceDesc => profiles.sort_by(|a, b| b.evidence_count.cmp(&a.evidence_count)),
        SortKey::EvidenceAsc => profiles.sort_by_key(|p| p.evidence_count),
        SortKey::UsernameAsc => profiles.sort_by_cached_key(|p| p.username_or_empty().to_lowercase()),
        SortKey::LatestActivity => {
            profiles.sort_by(|a, b| b.latest_date_or_empty().cmp(a.latest_date_or_empty()))
        }
    }
}
