use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::info;

use crate::dataset::loader::{load_document, DatasetError};
use crate::models::dataset::Document;

/// The single memoized document and where it came from.
#[derive(Debug, Clone)]
pub struct CachedDocument {
    pub source: PathBuf,
    pub document: Arc<Document>,
    pub loaded_at: DateTime<Utc>,
}

/// Single-entry memo keyed by source path.
/// Lives in `AppState`; invalidated only by `reload` or process restart.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entry: RwLock<Option<CachedDocument>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached document for `source` without touching the filesystem.
    pub fn cached(&self, source: &Path) -> Option<Arc<Document>> {
        self.entry
            .read()
            .as_ref()
            .filter(|c| c.source == source)
            .map(|c| Arc::clone(&c.document))
    }

    /// Returns the cached document for `source`, loading it on first use
    /// or when a different source is requested.
    pub fn get_or_load(&self, source: &Path) -> Result<Arc<Document>, DatasetError> {
        if let Some(document) = self.cached(source) {
            return Ok(document);
        }
        self.reload(source).map(|entry| entry.document)
    }

    /// Re-reads `source` unconditionally and returns the entry now being served.
    /// The previous entry survives a failed read.
    pub fn reload(&self, source: &Path) -> Result<CachedDocument, DatasetError> {
        let document = Arc::new(load_document(source)?);
        info!(
            "Loaded dataset from {} ({} profiles)",
            source.display(),
            document.profiles.len()
        );
        let entry = CachedDocument {
            source: source.to_path_buf(),
            document,
            loaded_at: Utc::now(),
        };
        *self.entry.write() = Some(entry.clone());
        Ok(entry)
    }

    #[cfg(test)]
    pub fn current(&self) -> Option<CachedDocument> {
        self.entry.read().clone()
    }
}
