use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::dataset::{Document, Metadata};
use crate::state::AppState;
use crate::views::analytics::{compute_analytics, AnalyticsReport, OverviewMetrics};
use crate::views::filter::{filter_options, CompanySizeFilter, ProfileQuery, ALL_COMPANY_SIZES};
use crate::views::rows::{project_rows, FlatRow};
use crate::views::sort::SortKey;
use crate::views::timeline::{aggregate_timeline, TimelinePoint};
use crate::views::{build_dashboard, list_profiles, DashboardView, ProfileListing};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ProfileParams {
    pub search: Option<String>,
    pub min_evidence: Option<u64>,
    pub company_size: Option<String>,
    pub sort: Option<String>,
}

impl ProfileParams {
    pub fn query(&self) -> ProfileQuery {
        ProfileQuery {
            search_text: self.search.clone(),
            min_evidence: self.min_evidence.unwrap_or(0),
            company_size: CompanySizeFilter::from_selection(self.company_size.as_deref()),
        }
    }

    /// Absent means the default ordering; an unknown value means no reordering.
    pub fn sort_key(&self) -> Option<SortKey> {
        match self.sort.as_deref() {
            None => Some(SortKey::default()),
            Some(value) => SortKey::parse(value),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OverviewResponse {
    pub metrics: OverviewMetrics,
    pub metadata: Metadata,
}

#[derive(Debug, Serialize)]
pub struct SortOption {
    pub id: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct FiltersResponse {
    /// Selectable company sizes, led by the `All` sentinel.
    pub company_sizes: Vec<String>,
    pub min_evidence: u64,
    pub max_evidence: u64,
    pub sort_options: Vec<SortOption>,
}

#[derive(Debug, Serialize)]
pub struct TimelineResponse {
    /// True when no evidence item carried a usable date.
    pub empty: bool,
    pub points: Vec<TimelinePoint>,
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub source: String,
    pub profiles: usize,
    pub loaded_at: DateTime<Utc>,
}

/// Serves the memoized document. A miss reads the file off the async runtime.
async fn snapshot(state: &AppState) -> Result<Arc<Document>, AppError> {
    if let Some(document) = state.cache.cached(&state.config.data_path) {
        return Ok(document);
    }

    let cache = Arc::clone(&state.cache);
    let source = state.config.data_path.clone();
    let loaded = tokio::task::spawn_blocking(move || cache.get_or_load(&source))
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    Ok(loaded?)
}

fn profile_params(
    params: Result<Query<ProfileParams>, QueryRejection>,
) -> Result<ProfileParams, AppError> {
    let Query(params) = params.map_err(|e| AppError::Validation(e.body_text()))?;
    Ok(params)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/overview
pub async fn handle_overview(
    State(state): State<AppState>,
) -> Result<Json<OverviewResponse>, AppError> {
    let document = snapshot(&state).await?;
    Ok(Json(OverviewResponse {
        metrics: OverviewMetrics::from(&document.metadata),
        metadata: document.metadata.clone(),
    }))
}

/// GET /api/v1/rows
pub async fn handle_rows(State(state): State<AppState>) -> Result<Json<Vec<FlatRow>>, AppError> {
    let document = snapshot(&state).await?;
    Ok(Json(project_rows(&document)))
}

/// GET /api/v1/filters
pub async fn handle_filters(
    State(state): State<AppState>,
) -> Result<Json<FiltersResponse>, AppError> {
    let document = snapshot(&state).await?;
    let options = filter_options(&project_rows(&document));

    let company_sizes = std::iter::once(ALL_COMPANY_SIZES.to_string())
        .chain(options.company_sizes)
        .collect();
    let sort_options = SortKey::ALL
        .iter()
        .map(|key| SortOption {
            id: key.id(),
            label: key.label(),
        })
        .collect();

    Ok(Json(FiltersResponse {
        company_sizes,
        min_evidence: options.min_evidence,
        max_evidence: options.max_evidence,
        sort_options,
    }))
}

/// GET /api/v1/profiles
///
/// Query: `search`, `min_evidence`, `company_size`, `sort`.
pub async fn handle_profiles(
    State(state): State<AppState>,
    params: Result<Query<ProfileParams>, QueryRejection>,
) -> Result<Json<ProfileListing>, AppError> {
    let params = profile_params(params)?;
    let document = snapshot(&state).await?;
    let rows = project_rows(&document);
    Ok(Json(list_profiles(
        &document,
        &rows,
        &params.query(),
        params.sort_key(),
    )))
}

/// GET /api/v1/timeline
pub async fn handle_timeline(
    State(state): State<AppState>,
) -> Result<Json<TimelineResponse>, AppError> {
    let document = snapshot(&state).await?;
    let points = aggregate_timeline(&document);
    Ok(Json(TimelineResponse {
        empty: points.is_empty(),
        points,
    }))
}

/// GET /api/v1/analytics
pub async fn handle_analytics(
    State(state): State<AppState>,
) -> Result<Json<AnalyticsReport>, AppError> {
    let document = snapshot(&state).await?;
    Ok(Json(compute_analytics(&project_rows(&document))))
}

/// GET /api/v1/dashboard
///
/// Accepts the same query parameters as `/api/v1/profiles`.
pub async fn handle_dashboard(
    State(state): State<AppState>,
    params: Result<Query<ProfileParams>, QueryRejection>,
) -> Result<Json<DashboardView>, AppError> {
    let params = profile_params(params)?;
    let document = snapshot(&state).await?;
    Ok(Json(build_dashboard(
        &document,
        &params.query(),
        params.sort_key(),
    )))
}

/// POST /api/v1/dataset/reload
///
/// Re-reads the configured source. On failure the previous snapshot keeps serving.
pub async fn handle_reload(
    State(state): State<AppState>,
) -> Result<Json<ReloadResponse>, AppError> {
    let cache = Arc::clone(&state.cache);
    let source = state.config.data_path.clone();

    let reloaded = tokio::task::spawn_blocking(move || cache.reload(&source))
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    let entry = reloaded.map_err(|e| {
        warn!("Dataset reload failed: {e}");
        AppError::from(e)
    })?;
    info!("Dataset reloaded ({} profiles)", entry.document.profiles.len());

    Ok(Json(ReloadResponse {
        source: entry.source.display().to_string(),
        profiles: entry.document.profiles.len(),
        loaded_at: entry.loaded_at,
    }))
}
