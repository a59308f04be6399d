//! Catalog persistence: loading, batch loading, and atomic writing.
//!
//! Catalogs are JSON arrays of objects written with a two-space indent and
//! non-ASCII text kept verbatim. `CatalogStore` lets the pipeline run against
//! files or memory through the same interface.

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, info};

use crate::constants::catalog::JSON_INDENT;
use crate::constants::index_table::UTF8_BOM;
use crate::data::{Catalog, Record};
use crate::errors::CatalogError;
use crate::transport::fs::{json_files_under, read_file, write_atomic};

/// Storage backend for one catalog document.
pub trait CatalogStore {
    /// Human-readable location used in reports and errors.
    fn location(&self) -> PathBuf;
    /// Load the full catalog.
    fn load(&self) -> Result<Catalog, CatalogError>;
    /// Replace the stored catalog with `catalog`.
    fn store(&self, catalog: &Catalog) -> Result<(), CatalogError>;
}

/// Catalog persisted as a JSON file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileCatalogStore {
    path: PathBuf,
}

impl FileCatalogStore {
    /// Store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogStore for FileCatalogStore {
    fn location(&self) -> PathBuf {
        self.path.clone()
    }

    fn load(&self) -> Result<Catalog, CatalogError> {
        load_catalog(&self.path)
    }

    fn store(&self, catalog: &Catalog) -> Result<(), CatalogError> {
        write_catalog(catalog, &self.path)
    }
}

/// In-memory catalog store.
///
/// An empty store reports `NotFound` on load, like a missing file.
pub struct InMemoryCatalogStore {
    label: PathBuf,
    catalog: RwLock<Option<Catalog>>,
}

impl fmt::Debug for InMemoryCatalogStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryCatalogStore")
            .field("label", &self.label)
            .finish()
    }
}

impl InMemoryCatalogStore {
    /// Empty store identified by `label` in reports.
    pub fn empty(label: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            catalog: RwLock::new(None),
        }
    }

    /// Store pre-populated with `catalog`.
    pub fn with_catalog(label: impl Into<PathBuf>, catalog: Catalog) -> Self {
        Self {
            label: label.into(),
            catalog: RwLock::new(Some(catalog)),
        }
    }

    /// Current contents, if any were stored.
    pub fn snapshot(&self) -> Result<Option<Catalog>, CatalogError> {
        self.catalog
            .read()
            .map_err(|_| CatalogError::Store("catalog lock poisoned".into()))
            .map(|guard| guard.clone())
    }
}

impl CatalogStore for InMemoryCatalogStore {
    fn location(&self) -> PathBuf {
        self.label.clone()
    }

    fn load(&self) -> Result<Catalog, CatalogError> {
        self.snapshot()?.ok_or_else(|| CatalogError::NotFound {
            path: self.label.clone(),
        })
    }

    fn store(&self, catalog: &Catalog) -> Result<(), CatalogError> {
        *self
            .catalog
            .write()
            .map_err(|_| CatalogError::Store("catalog lock poisoned".into()))? =
            Some(catalog.clone());
        Ok(())
    }
}

/// Load a catalog document from `path`.
///
/// Fails with `NotFound` when the path is missing and `Parse` when the content
/// is not a JSON array of objects.
pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let value = read_json(path)?;
    let catalog = Catalog::from_value(value).map_err(|reason| parse_error(path, reason))?;
    info!(path = %path.display(), records = catalog.len(), "loaded catalog");
    Ok(catalog)
}

/// Load a batch of new records from a file or a directory.
///
/// A file may hold an array of objects or a single object. For a directory,
/// every `*.json` file beneath it is loaded in sorted path order and the
/// records are concatenated.
pub fn load_batch(path: &Path) -> Result<Vec<Record>, CatalogError> {
    let files = if path.is_dir() {
        json_files_under(path)?
    } else {
        vec![path.to_path_buf()]
    };
    let mut records = Vec::new();
    for file in &files {
        let value = read_json(file)?;
        let loaded = match value {
            Value::Object(record) => vec![record],
            other => Catalog::from_value(other)
                .map_err(|reason| parse_error(file, reason))?
                .into_records(),
        };
        debug!(path = %file.display(), records = loaded.len(), "loaded batch file");
        records.extend(loaded);
    }
    info!(
        path = %path.display(),
        files = files.len(),
        records = records.len(),
        "loaded batch"
    );
    Ok(records)
}

/// Serialize a catalog: two-space indent, verbatim UTF-8, trailing newline.
pub fn serialize_catalog<W: Write>(catalog: &Catalog, writer: W) -> Result<(), CatalogError> {
    let formatter = PrettyFormatter::with_indent(JSON_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
    catalog
        .serialize(&mut serializer)
        .map_err(|err| CatalogError::Io(err.into()))?;
    let mut writer = serializer.into_inner();
    writer.write_all(b"\n")?;
    Ok(())
}

/// Serialize a catalog into an in-memory buffer.
pub fn catalog_to_bytes(catalog: &Catalog) -> Result<Vec<u8>, CatalogError> {
    let mut out = Vec::new();
    serialize_catalog(catalog, &mut out)?;
    Ok(out)
}

/// Atomically replace `path` with the serialized catalog.
pub fn write_catalog(catalog: &Catalog, path: &Path) -> Result<(), CatalogError> {
    write_atomic(path, |writer| serialize_catalog(catalog, writer))?;
    info!(path = %path.display(), records = catalog.len(), "wrote catalog");
    Ok(())
}

fn read_json(path: &Path) -> Result<Value, CatalogError> {
    let bytes = read_file(path)?;
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);
    serde_json::from_slice(body).map_err(|err| parse_error(path, err.to_string()))
}

fn parse_error(path: &Path, reason: String) -> CatalogError {
    CatalogError::Parse {
        path: path.to_path_buf(),
        reason,
    }
}
