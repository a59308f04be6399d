use std::collections::HashSet;
use tracing::debug;

use crate::data::{Catalog, Record};
use crate::errors::CatalogError;
use crate::fields::FieldPath;
use crate::types::RecordKey;

/// Append `batch` to `existing`, rejecting identifier collisions.
///
/// Every batch record must carry `key`. Its identifier must not appear in
/// `existing` or earlier in the batch. On success the result is `existing`
/// followed by `batch`, both in their original order. On failure nothing is
/// merged and the error names the first offending record.
pub fn merge_batch(
    existing: &Catalog,
    batch: &[Record],
    key: &FieldPath,
) -> Result<Catalog, CatalogError> {
    let mut seen: HashSet<RecordKey> = existing.keys(key).collect();
    for (index, record) in batch.iter().enumerate() {
        let id = key.text(record).ok_or_else(|| CatalogError::MissingKey {
            field: key.as_str().to_string(),
            index,
        })?;
        if !seen.insert(id.clone()) {
            return Err(CatalogError::DuplicateKey {
                field: key.as_str().to_string(),
                id,
            });
        }
    }

    let mut merged = existing.clone();
    merged.extend(batch.iter().cloned());
    debug!(
        existing = existing.len(),
        batch = batch.len(),
        merged = merged.len(),
        key = %key,
        "merged batch"
    );
    Ok(merged)
}
