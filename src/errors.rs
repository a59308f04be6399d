use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::{FieldName, RecordKey};

/// Error type for catalog loading, merging, writing, and table emission.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("'{}' not found", path.display())]
    NotFound { path: PathBuf },
    #[error("failed to parse '{}': {reason}", path.display())]
    Parse { path: PathBuf, reason: String },
    #[error("duplicate identifier '{id}' for key field '{field}'")]
    DuplicateKey { field: FieldName, id: RecordKey },
    #[error("batch record {index} has no value for key field '{field}'")]
    MissingKey { field: FieldName, index: usize },
    #[error("failed to write '{}': {reason}", path.display())]
    Write { path: PathBuf, reason: String },
    #[error("catalog store failure: {0}")]
    Store(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("index table error: {0}")]
    Csv(#[from] csv::Error),
    #[error("configuration error: {0}")]
    Configuration(String),
}
