use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use crate::models::dataset::Profile;
use crate::views::rows::FlatRow;

/// Company-size selection that places no restriction.
pub const ALL_COMPANY_SIZES: &str = "All";

/// Upper bound offered for the evidence slider when there are no rows.
pub const EMPTY_DATASET_MAX_EVIDENCE: u64 = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CompanySizeFilter {
    #[default]
    Any,
    Exact(String),
}

impl CompanySizeFilter {
    /// `None` and the `All` sentinel both mean no restriction.
    pub fn from_selection(selection: Option<&str>) -> Self {
        match selection {
            None | Some(ALL_COMPANY_SIZES) => CompanySizeFilter::Any,
            Some(size) => CompanySizeFilter::Exact(size.to_string()),
        }
    }

    fn matches(&self, company_size: &str) -> bool {
        match self {
            CompanySizeFilter::Any => true,
            CompanySizeFilter::Exact(wanted) => wanted == company_size,
        }
    }
}

/// Conjunction of the three independent row predicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileQuery {
    pub search_text: Option<String>,
    pub min_evidence: u64,
    pub company_size: CompanySizeFilter,
}

impl ProfileQuery {
    fn matches(&self, row: &FlatRow, needle: Option<&str>) -> bool {
        matches_search(row, needle)
            && meets_min_evidence(row, self.min_evidence)
            && self.company_size.matches(&row.company_size)
    }

    /// Lowercased search text, or `None` when every row matches.
    fn search_needle(&self) -> Option<String> {
        self.search_text
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }
}

/// Case-insensitive substring match on username or full name.
/// `needle` must already be lowercased.
fn matches_search(row: &FlatRow, needle: Option<&str>) -> bool {
    match needle {
        None => true,
        Some(needle) => {
            row.username.to_lowercase().contains(needle)
                || row.full_name.to_lowercase().contains(needle)
        }
    }
}

fn meets_min_evidence(row: &FlatRow, min_evidence: u64) -> bool {
    row.evidence_count >= min_evidence
}

/// Rows and profiles that survived the filter, both in input order.
#[derive(Debug)]
pub struct FilteredView<'a> {
    pub rows: Vec<&'a FlatRow>,
    pub profiles: Vec<&'a Profile>,
}

/// Applies `query` to `rows`, then selects every profile whose username
/// appears among the surviving rows. Duplicate usernames are all kept.
pub fn filter_profiles<'a>(
    rows: &'a [FlatRow],
    profiles: &'a [Profile],
    query: &ProfileQuery,
) -> FilteredView<'a> {
    let needle = query.search_needle();
    let rows: Vec<&FlatRow> = rows
        .iter()
        .filter(|row| query.matches(row, needle.as_deref()))
        .collect();

    let usernames: HashSet<&str> = rows.iter().map(|row| row.username.as_str()).collect();
    // A profile without a username has no identity to match on.
    let profiles = profiles
        .iter()
        .filter(|p| {
            p.username
                .as_deref()
                .is_some_and(|u| usernames.contains(u))
        })
        .collect();

    FilteredView { rows, profiles }
}

/// Selectable values for the filter controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    /// Distinct observed values, sorted. Does not include the `All` sentinel.
    pub company_sizes: Vec<String>,
    pub min_evidence: u64,
    pub max_evidence: u64,
}

pub fn filter_options(rows: &[FlatRow]) -> FilterOptions {
    let company_sizes: BTreeSet<&str> = rows.iter().map(|r| r.company_size.as_str()).collect();
    let max_evidence = rows
        .iter()
        .map(|r| r.evidence_count)
        .max()
        .unwrap_or(EMPTY_DATASET_MAX_EVIDENCE);

    FilterOptions {
        company_sizes: company_sizes.into_iter().map(str::to_string).collect(),
        min_evidence: 0,
        max_evidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::dataset::Document;
    use crate::views::rows::project_rows;

    fn profile(username: &str, full_name: &str, evidence_count: u64, size: &str) -> Profile {
        Profile {
            username: Some(username.to_string()),
            full_name: Some(full_name.to_string()),
            evidence_count,
            company_size: Some(size.to_string()),
            ..Default::default()
        }
    }

    fn sample() -> Document {
        Document {
            profiles: vec![
                profile("alice_dev", "Alice Smith", 5, "Startup"),
                profile("bob", "Robert Jones", 2, "Enterprise"),
                profile("carol", "Carol Alison", 9, "Startup"),
                profile("dave", "Dave Brown", 0, ""),
            ],
            ..Default::default()
        }
    }

    fn usernames(view: &FilteredView<'_>) -> Vec<String> {
        view.rows.iter().map(|r| r.username.clone()).collect()
    }

    #[test]
    fn test_default_query_is_identity() {
        let doc = sample();
        let rows = project_rows(&doc);
        let view = filter_profiles(&rows, &doc.profiles, &ProfileQuery::default());
        assert_eq!(view.rows.len(), rows.len());
        assert_eq!(view.profiles.len(), doc.profiles.len());
        assert!(view.rows.iter().zip(&rows).all(|(a, b)| *a == b));
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let doc = sample();
        let rows = project_rows(&doc);
        let query = ProfileQuery {
            search_text: Some("ALICE".into()),
            ..Default::default()
        };
        let view = filter_profiles(&rows, &doc.profiles, &query);
        // "Carol Alison" matches through the full name.
        assert_eq!(usernames(&view), vec!["alice_dev", "carol"]);
    }

    #[test]
    fn test_empty_search_matches_everything() {
        let doc = sample();
        let rows = project_rows(&doc);
        let query = ProfileQuery {
            search_text: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(filter_profiles(&rows, &doc.profiles, &query).rows.len(), 4);
    }

    #[test]
    fn test_min_evidence_is_inclusive() {
        let doc = sample();
        let rows = project_rows(&doc);
        let query = ProfileQuery {
            min_evidence: 5,
            ..Default::default()
        };
        let view = filter_profiles(&rows, &doc.profiles, &query);
        assert_eq!(usernames(&view), vec!["alice_dev", "carol"]);
    }

    #[test]
    fn test_company_size_exact_match() {
        let doc = sample();
        let rows = project_rows(&doc);
        let query = ProfileQuery {
            company_size: CompanySizeFilter::from_selection(Some("Startup")),
            ..Default::default()
        };
        let view = filter_profiles(&rows, &doc.profiles, &query);
        assert_eq!(usernames(&view), vec!["alice_dev", "carol"]);
    }

    #[test]
    fn test_unknown_company_size_yields_empty_set() {
        let doc = sample();
        let rows = project_rows(&doc);
        let query = ProfileQuery {
            company_size: CompanySizeFilter::Exact("Government".into()),
            ..Default::default()
        };
        let view = filter_profiles(&rows, &doc.profiles, &query);
        assert!(view.rows.is_empty());
        assert!(view.profiles.is_empty());
    }

    #[test]
    fn test_all_sentinel_is_unrestricted() {
        assert_eq!(
            CompanySizeFilter::from_selection(Some(ALL_COMPANY_SIZES)),
            CompanySizeFilter::Any
        );
        assert_eq!(CompanySizeFilter::from_selection(None), CompanySizeFilter::Any);
    }

    #[test]
    fn test_predicates_commute() {
        let doc = sample();
        let rows = project_rows(&doc);
        let query = ProfileQuery {
            search_text: Some("a".into()),
            min_evidence: 2,
            company_size: CompanySizeFilter::Exact("Startup".into()),
        };
        let needle = query.search_needle();
        let preds: [&dyn Fn(&FlatRow) -> bool; 3] = [
            &|r: &FlatRow| matches_search(r, needle.as_deref()),
            &|r: &FlatRow| meets_min_evidence(r, query.min_evidence),
            &|r: &FlatRow| query.company_size.matches(&r.company_size),
        ];
        let orders = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];

        let expected = filter_profiles(&rows, &doc.profiles, &query);
        for order in orders {
            let mut narrowed: Vec<&FlatRow> = rows.iter().collect();
            for i in order {
                narrowed.retain(|r| preds[i](*r));
            }
            assert_eq!(narrowed, expected.rows, "order {order:?}");
        }
    }

    #[test]
    fn test_output_is_subset_of_input() {
        let doc = sample();
        let rows = project_rows(&doc);
        let query = ProfileQuery {
            search_text: Some("o".into()),
            min_evidence: 1,
            ..Default::default()
        };
        let view = filter_profiles(&rows, &doc.profiles, &query);
        assert!(view.rows.iter().all(|r| rows.contains(r)));
        assert!(view.profiles.iter().all(|p| doc.profiles.contains(p)));
    }

    #[test]
    fn test_duplicate_usernames_are_all_kept() {
        let doc = Document {
            profiles: vec![
                profile("twin", "First", 1, "Startup"),
                profile("solo", "Other", 1, "Startup"),
                profile("twin", "Second", 8, "Enterprise"),
            ],
            ..Default::default()
        };
        let rows = project_rows(&doc);
        let query = ProfileQuery {
            search_text: Some("first".into()),
            ..Default::default()
        };
        let view = filter_profiles(&rows, &doc.profiles, &query);
        assert_eq!(view.rows.len(), 1);
        let names: Vec<_> = view
            .profiles
            .iter()
            .map(|p| p.full_name.as_deref().unwrap_or(""))
            .collect();
        assert_eq!(names, vec!["First", "Second"]);
    }

    #[test]
    fn test_profile_without_username_is_not_selected() {
        let doc = Document {
            profiles: vec![Profile {
                full_name: Some("Anonymous".into()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let rows = project_rows(&doc);
        let view = filter_profiles(&rows, &doc.profiles, &ProfileQuery::default());
        assert_eq!(view.rows.len(), 1);
        assert!(view.profiles.is_empty());
    }

    #[test]
    fn test_empty_dataset_filters_to_nothing() {
        let doc = Document::default();
        let rows = project_rows(&doc);
        let query = ProfileQuery {
            search_text: Some("anything".into()),
            min_evidence: 3,
            company_size: CompanySizeFilter::Exact("Startup".into()),
        };
        let view = filter_profiles(&rows, &doc.profiles, &query);
        assert!(view.rows.is_empty());
        assert!(view.profiles.is_empty());
    }

    #[test]
    fn test_filter_options() {
        let rows = project_rows(&sample());
        let options = filter_options(&rows);
        assert_eq!(options.company_sizes, vec!["", "Enterprise", "Startup"]);
        assert_eq!(options.min_evidence, 0);
        assert_eq!(options.max_evidence, 9);
    }

    #[test]
    fn test_filter_options_empty_dataset_fallback() {
        let options = filter_options(&[]);
        assert!(options.company_sizes.is_empty());
        assert_eq!(options.max_evidence, EMPTY_DATASET_MAX_EVIDENCE);
    }
}
