//! Load, merge, summarize, write.
//!
//! The destination is written only after the load, merge, and aggregation
//! steps all succeed, so a failed run leaves existing output untouched.

use std::path::PathBuf;
use tracing::{info, warn};

use crate::config::CatalogConfig;
use crate::data::{Catalog, Record};
use crate::errors::CatalogError;
use crate::merge::merge_batch;
use crate::store::CatalogStore;
use crate::summary::{GroupSummary, aggregate};

/// Outcome of a successful merge run.
#[derive(Clone, Debug, PartialEq)]
pub struct MergeReport {
    /// Where the existing catalog was read from.
    pub source: PathBuf,
    /// Where the merged catalog was written.
    pub destination: PathBuf,
    /// Record count before the merge.
    pub existing_records: usize,
    /// Records appended by the batch.
    pub batch_records: usize,
    /// Record count after the merge.
    pub merged_records: usize,
    /// Group counts over the merged catalog.
    pub groups: GroupSummary,
}

/// Merge-and-aggregate pipeline over catalog stores.
#[derive(Clone, Debug, Default)]
pub struct MergePipeline {
    config: CatalogConfig,
}

impl MergePipeline {
    /// Create a pipeline with the given field roles.
    pub fn new(config: CatalogConfig) -> Result<Self, CatalogError> {
        Ok(Self {
            config: config.validated()?,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Merge `batch` into `existing` and summarize, without touching storage.
    pub fn prepare(
        &self,
        existing: &Catalog,
        batch: &[Record],
    ) -> Result<(Catalog, GroupSummary), CatalogError> {
        let merged = merge_batch(existing, batch, &self.config.key_field)?;
        let groups = aggregate(
            &merged,
            &self.config.group_field,
            &self.config.unknown_group,
        );
        let missing = groups.missing();
        if missing > 0 {
            warn!(
                field = %self.config.group_field,
                records = missing,
                bucket = %self.config.unknown_group,
                "records without a group value"
            );
        }
        Ok((merged, groups))
    }

    /// Load from `source`, append `batch`, summarize, then write to `destination`.
    ///
    /// `source` and `destination` may refer to the same location.
    pub fn run(
        &self,
        source: &dyn CatalogStore,
        batch: &[Record],
        destination: &dyn CatalogStore,
    ) -> Result<MergeReport, CatalogError> {
        let existing = source.load()?;
        let (merged, groups) = self.prepare(&existing, batch)?;
        destination.store(&merged)?;

        let report = MergeReport {
            source: source.location(),
            destination: destination.location(),
            existing_records: existing.len(),
            batch_records: batch.len(),
            merged_records: merged.len(),
            groups,
        };
        info!(
            source = %report.source.display(),
            destination = %report.destination.display(),
            existing = report.existing_records,
            batch = report.batch_records,
            merged = report.merged_records,
            groups = report.groups.len(),
            "catalog merge complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogKind;
    use crate::store::InMemoryCatalogStore;
    use serde_json::{Value, json};

    fn records(value: Value) -> Vec<Record> {
        Catalog::from_value(value).unwrap().into_records()
    }

    #[test]
    fn run_writes_merged_catalog_and_reports_counts() {
        let source = InMemoryCatalogStore::with_catalog(
            "memory://existing",
            Catalog::new(records(json!([
                {"recipeId": "r1", "category": "A"},
                {"recipeId": "r2", "category": "B"}
            ]))),
        );
        let destination = InMemoryCatalogStore::empty("memory://merged");
        let batch = records(json!([{"recipeId": "r3", "category": "A"}]));

        let report = MergePipeline::default()
            .run(&source, &batch, &destination)
            .unwrap();
        assert_eq!(report.existing_records, 2);
        assert_eq!(report.batch_records, 1);
        assert_eq!(report.merged_records, 3);
        assert_eq!(report.groups.count("A"), 2);
        assert_eq!(report.destination, PathBuf::from("memory://merged"));

        let written = destination.snapshot().unwrap().unwrap();
        assert_eq!(written.len(), 3);
        assert_eq!(written.records()[2], batch[0]);
    }

    #[test]
    fn duplicate_batch_leaves_destination_untouched() {
        let existing = Catalog::new(records(json!([{"plantId": "cactus_001"}])));
        let store = InMemoryCatalogStore::with_catalog("memory://plants", existing.clone());
        let batch = records(json!([{"plantId": "cactus_001", "category": "cactus"}]));

        let pipeline = MergePipeline::new(CatalogConfig::for_kind(CatalogKind::Plants)).unwrap();
        let err = pipeline.run(&store, &batch, &store).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateKey { ref id, .. } if id == "cactus_001"));
        assert_eq!(store.snapshot().unwrap(), Some(existing));
    }

    #[test]
    fn missing_source_aborts_before_writing() {
        let source = InMemoryCatalogStore::empty("memory://absent");
        let destination = InMemoryCatalogStore::empty("memory://out");
        let err = MergePipeline::default()
            .run(&source, &[], &destination)
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { .. }));
        assert_eq!(destination.snapshot().unwrap(), None);
    }

    #[test]
    fn prepare_separates_missing_groups_from_literal_unknown() {
        let existing = Catalog::new(records(json!([
            {"recipeId": "r1", "category": "unknown"},
            {"recipeId": "r2", "category": "A"}
        ])));
        let batch = records(json!([{"recipeId": "r3"}]));
        let (merged, groups) = MergePipeline::default().prepare(&existing, &batch).unwrap();
        assert_eq!(merged.len(), 3);
        assert_eq!(groups.count("unknown"), 2);
        assert_eq!(groups.missing(), 1);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = MergePipeline::new(CatalogConfig::default().with_group_field("")).unwrap_err();
        assert!(matches!(err, CatalogError::Configuration(_)));
    }
}
