//! Summary figures for the overview metrics and the distribution charts.
//!
//! Everything here works on the full row table, not the filtered subset.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::models::dataset::Metadata;
use crate::views::rows::FlatRow;

pub const TOP_PROFILES_LIMIT: usize = 10;
pub const TOP_COMPANIES_LIMIT: usize = 15;

const GENERATED_AT_PLACEHOLDER: &str = "N/A";

/// Headline counters, read from metadata without reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverviewMetrics {
    pub total_unique_profiles: u64,
    pub total_evidence_items: u64,
    pub source_files: u64,
    pub profiles_merged: u64,
    pub duplicate_evidence_removed: u64,
    pub generated_at: String,
}

impl From<&Metadata> for OverviewMetrics {
    fn from(metadata: &Metadata) -> Self {
        Self {
            total_unique_profiles: metadata.total_unique_profiles,
            total_evidence_items: metadata.total_evidence_items,
            source_files: metadata.source_files,
            profiles_merged: metadata.profiles_merged,
            duplicate_evidence_removed: metadata.duplicate_evidence_removed,
            generated_at: metadata
                .generated_at
                .clone()
                .unwrap_or_else(|| GENERATED_AT_PLACEHOLDER.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvidenceBucket {
    pub evidence_count: u64,
    pub profiles: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopProfile {
    pub username: String,
    pub full_name: String,
    pub company: String,
    pub evidence_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyticsReport {
    pub evidence_distribution: Vec<EvidenceBucket>,
    pub company_size_distribution: Vec<CategoryCount>,
    pub top_profiles: Vec<TopProfile>,
    pub top_companies: Vec<CategoryCount>,
}

pub fn compute_analytics(rows: &[FlatRow]) -> AnalyticsReport {
    AnalyticsReport {
        evidence_distribution: evidence_distribution(rows),
        company_size_distribution: value_counts(rows.iter().map(|r| r.company_size.as_str())),
        top_profiles: top_profiles(rows, TOP_PROFILES_LIMIT),
        top_companies: top_companies(rows, TOP_COMPANIES_LIMIT),
    }
}

/// Number of profiles per distinct `evidence_count`, ascending.
pub fn evidence_distribution(rows: &[FlatRow]) -> Vec<EvidenceBucket> {
    let mut histogram: BTreeMap<u64, usize> = BTreeMap::new();
    for row in rows {
        *histogram.entry(row.evidence_count).or_default() += 1;
    }
    histogram
        .into_iter()
        .map(|(evidence_count, profiles)| EvidenceBucket {
            evidence_count,
            profiles,
        })
        .collect()
}

/// The `limit` rows with the most evidence. Ties keep row order.
pub fn top_profiles(rows: &[FlatRow], limit: usize) -> Vec<TopProfile> {
    let mut ranked: Vec<&FlatRow> = rows.iter().collect();
    ranked.sort_by(|a, b| b.evidence_count.cmp(&a.evidence_count));
    ranked
        .into_iter()
        .take(limit)
        .map(|row| TopProfile {
            username: row.username.clone(),
            full_name: row.full_name.clone(),
            company: row.company.clone(),
            evidence_count: row.evidence_count,
        })
        .collect()
}

pub fn top_companies(rows: &[FlatRow], limit: usize) -> Vec<CategoryCount> {
    let mut counts = value_counts(rows.iter().map(|r| r.company.as_str()));
    counts.truncate(limit);
    counts
}

/// Occurrences per value, most frequent first; ties keep first-seen order.
fn value_counts<'a>(values: impl Iterator<Item = &'a str>) -> Vec<CategoryCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<CategoryCount> = Vec::new();
    for value in values {
        match index.get(value) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(value, counts.len());
                counts.push(CategoryCount {
                    value: value.to_string(),
                    count: 1,
                });
            }
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(username: &str, company: &str, size: &str, evidence_count: u64) -> FlatRow {
        FlatRow {
            username: username.to_string(),
            full_name: format!("{username} full"),
            roles: String::new(),
            company: company.to_string(),
            company_size: size.to_string(),
            evidence_count,
            first_date: String::new(),
            latest_date: String::new(),
        }
    }

    fn sample() -> Vec<FlatRow> {
        vec![
            row("a", "Acme", "Startup", 3),
            row("b", "Globex", "Enterprise", 1),
            row("c", "Acme", "Startup", 3),
            row("d", "Initech", "", 7),
            row("e", "Globex", "Enterprise", 1),
            row("f", "Acme", "Startup", 0),
        ]
    }

    #[test]
    fn test_overview_defaults() {
        let metrics = OverviewMetrics::from(&Metadata::default());
        assert_eq!(metrics.total_unique_profiles, 0);
        assert_eq!(metrics.duplicate_evidence_removed, 0);
        assert_eq!(metrics.generated_at, "N/A");
    }

    #[test]
    fn test_overview_uses_metadata_verbatim() {
        let metadata = Metadata {
            total_unique_profiles: 120,
            total_evidence_items: 4,
            generated_at: Some("2025-01-02T03:04:05".into()),
            ..Default::default()
        };
        let metrics = OverviewMetrics::from(&metadata);
        assert_eq!(metrics.total_unique_profiles, 120);
        assert_eq!(metrics.total_evidence_items, 4);
        assert_eq!(metrics.generated_at, "2025-01-02T03:04:05");
    }

    #[test]
    fn test_evidence_distribution() {
        let buckets = evidence_distribution(&sample());
        let pairs: Vec<_> = buckets.iter().map(|b| (b.evidence_count, b.profiles)).collect();
        assert_eq!(pairs, vec![(0, 1), (1, 2), (3, 2), (7, 1)]);
    }

    #[test]
    fn test_company_size_distribution_counts_empty_value() {
        let report = compute_analytics(&sample());
        let pairs: Vec<_> = report
            .company_size_distribution
            .iter()
            .map(|c| (c.value.as_str(), c.count))
            .collect();
        assert_eq!(pairs, vec![("Startup", 3), ("Enterprise", 2), ("", 1)]);
    }

    #[test]
    fn test_top_profiles_ties_keep_row_order() {
        let top = top_profiles(&sample(), 3);
        let names: Vec<_> = top.iter().map(|p| p.username.as_str()).collect();
        assert_eq!(names, vec!["d", "a", "c"]);
        assert_eq!(top[0].full_name, "d full");
        assert_eq!(top[0].company, "Initech");
    }

    #[test]
    fn test_top_companies_limit() {
        let top = top_companies(&sample(), 2);
        let pairs: Vec<_> = top.iter().map(|c| (c.value.as_str(), c.count)).collect();
        assert_eq!(pairs, vec![("Acme", 3), ("Globex", 2)]);
    }

    #[test]
    fn test_empty_rows() {
        let report = compute_analytics(&[]);
        assert!(report.evidence_distribution.is_empty());
        assert!(report.company_size_distribution.is_empty());
        assert!(report.top_profiles.is_empty());
        assert!(report.top_companies.is_empty());
    }
}
