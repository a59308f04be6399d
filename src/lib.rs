#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Command runners shared by the crate's binaries.
pub mod apps;
/// Catalog and index-table configuration types.
pub mod config;
/// Centralized constants for fields, persistence, and table output.
pub mod constants;
/// Record and catalog types.
pub mod data;
/// Field keys and nested field paths.
pub mod fields;
/// Index-definition table emitter.
pub mod index_table;
/// Batch merging with identifier collision checks.
pub mod merge;
/// Load, merge, summarize, and write in one run.
pub mod pipeline;
/// Catalog persistence backends.
pub mod store;
/// Group counts over a catalog.
pub mod summary;
/// Input/output transports (local filesystem today).
pub mod transport;
/// Shared type aliases.
pub mod types;

mod errors;

pub use config::{CatalogConfig, CatalogKind, IndexTableConfig};
pub use data::{Catalog, Record};
pub use errors::CatalogError;
pub use fields::{FieldKey, FieldPath};
pub use index_table::{
    IndexDefinition, IndexTableStats, emit_index_table, load_index_definitions,
    write_index_table,
};
pub use merge::merge_batch;
pub use pipeline::{MergePipeline, MergeReport};
pub use store::{
    CatalogStore, FileCatalogStore, InMemoryCatalogStore, load_batch, load_catalog,
    write_catalog,
};
pub use summary::{GroupSummary, aggregate};
pub use types::{CollectionName, FieldName, GroupKey, IndexName, RecordKey};
