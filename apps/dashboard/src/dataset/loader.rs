use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::models::dataset::Document;

/// Document-level load failures. All of them are terminal for a rendering pass.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error parsing JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Error parsing JSON in {}: expected a top-level object, found {found}", path.display())]
    Shape { path: PathBuf, found: &'static str },
}

impl DatasetError {
    /// Stable code for API consumers.
    pub fn code(&self) -> &'static str {
        match self {
            DatasetError::NotFound { .. } => "DATASET_NOT_FOUND",
            DatasetError::Read { .. } => "DATASET_READ_ERROR",
            DatasetError::Parse { .. } | DatasetError::Shape { .. } => "DATASET_PARSE_ERROR",
        }
    }
}

/// Reads and parses the document at `path`.
/// The file handle is held only for the duration of the read.
pub fn load_document(path: &Path) -> Result<Document, DatasetError> {
    let raw = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => DatasetError::NotFound {
            path: path.to_path_buf(),
        },
        _ => DatasetError::Read {
            path: path.to_path_buf(),
            source,
        },
    })?;
    parse_document(path, &raw)
}

/// Parses already-read content. `path` is only used for diagnostics.
pub fn parse_document(path: &Path, raw: &str) -> Result<Document, DatasetError> {
    let parse_err = |source| DatasetError::Parse {
        path: path.to_path_buf(),
        source,
    };

    // Only an object root is a document; anything else is classified for the message.
    if !raw.trim_start().starts_with('{') {
        let value: Value = serde_json::from_str(raw).map_err(parse_err)?;
        return Err(DatasetError::Shape {
            path: path.to_path_buf(),
            found: json_kind(&value),
        });
    }
    serde_json::from_str(raw).map_err(parse_err)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
