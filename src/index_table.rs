//! Index-definition table emitter.
//!
//! Turns an ordered list of database index definitions into a delimited text
//! table with a fixed eight-column header. Pure formatting: rows come out in
//! input order with no merging or deduplication.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::config::IndexTableConfig;
use crate::constants::index_table::{HEADER, UNIQUE_LABELS, UTF8_BOM};
use crate::errors::CatalogError;
use crate::transport::fs::{read_file, write_atomic};
use crate::types::{CollectionName, IndexName};

/// One index definition row.
///
/// Deserializes from either an eight-element array (in column order) or an
/// object with camelCase field names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexDefinition {
    /// Collection the index belongs to.
    pub collection: CollectionName,
    /// Index name within the collection.
    pub index_name: IndexName,
    /// Indexed fields, `|`-separated.
    pub fields: String,
    /// Sort order per field, `|`-separated (`1`, `-1`, or a label).
    pub sort_order: String,
    /// Uniqueness label as authored (`是` / `否`).
    pub unique: String,
    /// Priority label.
    pub priority: String,
    /// Short description.
    pub description: String,
    /// Query pattern the index serves.
    pub purpose: String,
}

impl IndexDefinition {
    /// Build a definition from its eight columns in header order.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        collection: impl Into<CollectionName>,
        index_name: impl Into<IndexName>,
        fields: impl Into<String>,
        sort_order: impl Into<String>,
        unique: impl Into<String>,
        priority: impl Into<String>,
        description: impl Into<String>,
        purpose: impl Into<String>,
    ) -> Self {
        Self {
            collection: collection.into(),
            index_name: index_name.into(),
            fields: fields.into(),
            sort_order: sort_order.into(),
            unique: unique.into(),
            priority: priority.into(),
            description: description.into(),
            purpose: purpose.into(),
        }
    }

    /// Columns in header order.
    pub fn row(&self) -> [&str; 8] {
        [
            &self.collection,
            &self.index_name,
            &self.fields,
            &self.sort_order,
            &self.unique,
            &self.priority,
            &self.description,
            &self.purpose,
        ]
    }

    /// True when the uniqueness label marks a unique index.
    pub fn is_unique(&self) -> bool {
        let label = self.unique.trim();
        UNIQUE_LABELS
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(label))
    }
}

/// Counts reported after emitting a table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IndexTableStats {
    /// Number of index definitions.
    pub indexes: usize,
    /// Number of distinct collections.
    pub collections: usize,
    /// Number of unique indexes.
    pub unique_indexes: usize,
}

impl IndexTableStats {
    /// Compute counts for `definitions`.
    pub fn from_definitions(definitions: &[IndexDefinition]) -> Self {
        let collections: HashSet<&str> = definitions
            .iter()
            .map(|definition| definition.collection.as_str())
            .collect();
        Self {
            indexes: definitions.len(),
            collections: collections.len(),
            unique_indexes: definitions
                .iter()
                .filter(|definition| definition.is_unique())
                .count(),
        }
    }
}

/// Write the header row and one row per definition to `writer`, in input order.
pub fn emit_index_table<W: Write>(
    definitions: &[IndexDefinition],
    mut writer: W,
    config: &IndexTableConfig,
) -> Result<(), CatalogError> {
    let config = config.validated()?;
    if config.write_bom {
        writer.write_all(UTF8_BOM)?;
    }
    let mut table = csv::WriterBuilder::new()
        .delimiter(config.delimiter)
        .terminator(csv::Terminator::CRLF)
        .from_writer(writer);
    table.write_record(HEADER)?;
    for definition in definitions {
        table.write_record(definition.row())?;
    }
    table.flush()?;
    Ok(())
}

/// Render the table into memory.
pub fn index_table_to_bytes(
    definitions: &[IndexDefinition],
    config: &IndexTableConfig,
) -> Result<Vec<u8>, CatalogError> {
    let mut out = Vec::new();
    emit_index_table(definitions, &mut out, config)?;
    Ok(out)
}

/// Atomically replace `path` with the rendered table and return its counts.
pub fn write_index_table(
    definitions: &[IndexDefinition],
    path: &Path,
    config: &IndexTableConfig,
) -> Result<IndexTableStats, CatalogError> {
    write_atomic(path, |writer| emit_index_table(definitions, writer, config))?;
    let stats = IndexTableStats::from_definitions(definitions);
    info!(
        path = %path.display(),
        indexes = stats.indexes,
        collections = stats.collections,
        unique_indexes = stats.unique_indexes,
        "wrote index table"
    );
    Ok(stats)
}

/// Load definitions from a JSON array of rows or objects.
pub fn load_index_definitions(path: &Path) -> Result<Vec<IndexDefinition>, CatalogError> {
    let bytes = read_file(path)?;
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);
    serde_json::from_slice(body).map_err(|err| CatalogError::Parse {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}
