use serde_json::Value;
use std::fmt;

pub use crate::constants::fields::{
    FIELD_CATEGORY, FIELD_PATH_DELIMITER, FIELD_PLANT_ID, FIELD_RECIPE_ID,
};
use crate::data::Record;
use crate::types::FieldName;

/// Canonical identifier for well-known record fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldKey {
    name: &'static str,
}

impl FieldKey {
    /// Create a field key with a canonical static name.
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }

    /// Return the raw field name.
    pub const fn as_str(&self) -> &'static str {
        self.name
    }

    /// Owned path for this key.
    pub fn path(&self) -> FieldPath {
        FieldPath::new(self.name)
    }
}

/// Field selector, either a top-level name or a dotted path into nested mappings.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldPath {
    name: FieldName,
}

impl FieldPath {
    /// Create a path from a field name such as `category` or `unlockRequirements.userLevel`.
    pub fn new(name: impl Into<FieldName>) -> Self {
        Self { name: name.into() }
    }

    /// Return the name as authored.
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// Resolve the path against a record.
    ///
    /// A literal top-level key wins over a dotted interpretation, so fields whose
    /// names contain the delimiter stay addressable.
    pub fn lookup<'a>(&self, record: &'a Record) -> Option<&'a Value> {
        if let Some(value) = record.get(&self.name) {
            return Some(value);
        }
        let mut segments = self.name.split(FIELD_PATH_DELIMITER);
        let first = segments.next()?;
        let mut current = record.get(first)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Canonical text of the value at this path; `None` when absent or `null`.
    pub fn text(&self, record: &Record) -> Option<String> {
        self.lookup(record).and_then(canonical_text)
    }
}

impl From<FieldKey> for FieldPath {
    fn from(key: FieldKey) -> Self {
        key.path()
    }
}

impl From<&str> for FieldPath {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Text used to compare identifiers and group values.
///
/// Strings map to themselves; other values map to their compact JSON rendering,
/// so `"42"` and `42` share the same text. `null` has no text.
pub fn canonical_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}
