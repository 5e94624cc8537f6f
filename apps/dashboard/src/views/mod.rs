// Derived views over the loaded document.
// Every interaction recomputes these from the immutable snapshot; nothing is cached here.

pub mod analytics;
pub mod filter;
pub mod handlers;
pub mod rows;
pub mod sort;
pub mod timeline;

use serde::Serialize;
use tracing::debug;

use crate::models::dataset::{Document, Metadata, Profile};
use crate::views::filter::{filter_options, filter_profiles, FilterOptions, ProfileQuery};
use crate::views::rows::{project_rows, FlatRow};
use crate::views::sort::{sort_profiles, SortKey};
use crate::views::timeline::{aggregate_timeline, TimelinePoint};

/// Filtered and ordered profiles ready for the card list.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileListing {
    pub showing: usize,
    pub sort: Option<SortKey>,
    pub profiles: Vec<Profile>,
}

/// Everything the presentation layer needs for one render.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub metadata: Metadata,
    pub rows: Vec<FlatRow>,
    pub listing: ProfileListing,
    pub timeline: Vec<TimelinePoint>,
    pub filters: FilterOptions,
}

pub fn list_profiles(
    document: &Document,
    rows: &[FlatRow],
    query: &ProfileQuery,
    sort: Option<SortKey>,
) -> ProfileListing {
    let mut filtered = filter_profiles(rows, &document.profiles, query);
    sort_profiles(&mut filtered.profiles, sort);
    debug!(
        "Filtered {} of {} rows, {} profiles (sort: {:?})",
        filtered.rows.len(),
        rows.len(),
        filtered.profiles.len(),
        sort
    );

    ProfileListing {
        showing: filtered.profiles.len(),
        sort,
        profiles: filtered.profiles.into_iter().cloned().collect(),
    }
}

pub fn build_dashboard(
    document: &Document,
    query: &ProfileQuery,
    sort: Option<SortKey>,
) -> DashboardView {
    let rows = project_rows(document);
    let listing = list_profiles(document, &rows, query, sort);
    let filters = filter_options(&rows);

    DashboardView {
        metadata: document.metadata.clone(),
        timeline: aggregate_timeline(document),
        listing,
        filters,
        rows,
    }
}
