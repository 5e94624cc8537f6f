use std::sync::Arc;

use crate::config::Config;
use crate::dataset::DatasetCache;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Single-entry document memo. Replaced only by an explicit reload.
    pub cache: Arc<DatasetCache>,
}
