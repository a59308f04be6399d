use indexmap::IndexMap;

use crate::data::Catalog;
use crate::fields::FieldPath;
use crate::types::GroupKey;

/// Per-group record counts derived from a catalog.
///
/// Keys keep first-seen order; use [`GroupSummary::sorted`] for reporting.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupSummary {
    counts: IndexMap<GroupKey, usize>,
    missing: usize,
}

impl GroupSummary {
    /// Count of records holding `group`, or zero.
    pub fn count(&self, group: &str) -> usize {
        self.counts.get(group).copied().unwrap_or(0)
    }

    /// Number of distinct groups.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True when no records were counted.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Records that had no value for the grouping field.
    ///
    /// These are also included in the unknown bucket's count, which may hold
    /// records whose value is literally the bucket name.
    pub fn missing(&self) -> usize {
        self.missing
    }

    /// Sum of all group counts.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Groups in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts
            .iter()
            .map(|(group, count)| (group.as_str(), *count))
    }

    /// Groups sorted by key.
    pub fn sorted(&self) -> Vec<(GroupKey, usize)> {
        let mut entries: Vec<(GroupKey, usize)> = self
            .counts
            .iter()
            .map(|(group, count)| (group.clone(), *count))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

/// Count records per distinct value of `field`.
///
/// Records without the field, or holding `null`, are counted under
/// `unknown_group`, so the counts always sum to the catalog length.
pub fn aggregate(catalog: &Catalog, field: &FieldPath, unknown_group: &str) -> GroupSummary {
    let mut counts: IndexMap<GroupKey, usize> = IndexMap::new();
    let mut missing = 0;
    for record in catalog {
        let group = field.text(record).unwrap_or_else(|| {
            missing += 1;
            unknown_group.to_string()
        });
        *counts.entry(group).or_insert(0) += 1;
    }
    GroupSummary { counts, missing }
}
