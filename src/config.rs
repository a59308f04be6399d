use crate::constants::catalog::UNKNOWN_GROUP;
use crate::constants::index_table::DEFAULT_DELIMITER;
use crate::errors::CatalogError;
use crate::fields::{FIELD_CATEGORY, FIELD_PLANT_ID, FIELD_RECIPE_ID, FieldPath};
use crate::types::GroupKey;

/// Record domains with known identifier and grouping fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CatalogKind {
    /// Vegan recipes keyed by `recipeId`, grouped by `category`.
    #[default]
    Recipes,
    /// Plant gamification templates keyed by `plantId`, grouped by `category`.
    Plants,
}

impl CatalogKind {
    /// Identifier field for this domain.
    pub fn key_field(self) -> FieldPath {
        match self {
            CatalogKind::Recipes => FIELD_RECIPE_ID.path(),
            CatalogKind::Plants => FIELD_PLANT_ID.path(),
        }
    }

    /// Reporting field for this domain.
    pub fn group_field(self) -> FieldPath {
        match self {
            CatalogKind::Recipes | CatalogKind::Plants => FIELD_CATEGORY.path(),
        }
    }
}

/// Field roles used when merging and summarizing a catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Field whose value must be unique across the merged catalog.
    pub key_field: FieldPath,
    /// Field whose values are counted in the group summary.
    pub group_field: FieldPath,
    /// Bucket for records that lack the grouping field.
    pub unknown_group: GroupKey,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self::for_kind(CatalogKind::default())
    }
}

impl CatalogConfig {
    /// Preset for a known record domain.
    pub fn for_kind(kind: CatalogKind) -> Self {
        Self {
            key_field: kind.key_field(),
            group_field: kind.group_field(),
            unknown_group: UNKNOWN_GROUP.to_string(),
        }
    }

    /// Override the identifier field.
    pub fn with_key_field(mut self, key_field: impl Into<FieldPath>) -> Self {
        self.key_field = key_field.into();
        self
    }

    /// Override the grouping field.
    pub fn with_group_field(mut self, group_field: impl Into<FieldPath>) -> Self {
        self.group_field = group_field.into();
        self
    }

    /// Override the bucket used for records missing the grouping field.
    pub fn with_unknown_group(mut self, unknown_group: impl Into<GroupKey>) -> Self {
        self.unknown_group = unknown_group.into();
        self
    }

    /// Reject empty field names.
    pub fn validated(self) -> Result<Self, CatalogError> {
        if self.key_field.as_str().is_empty() {
            return Err(CatalogError::Configuration(
                "key field must not be empty".to_string(),
            ));
        }
        if self.group_field.as_str().is_empty() {
            return Err(CatalogError::Configuration(
                "group field must not be empty".to_string(),
            ));
        }
        Ok(self)
    }
}

/// Output options for the index-definition table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexTableConfig {
    /// Single-byte field delimiter.
    pub delimiter: u8,
    /// Whether a UTF-8 byte order mark precedes the header.
    pub write_bom: bool,
}

impl Default for IndexTableConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            write_bom: true,
        }
    }
}

impl IndexTableConfig {
    /// Override the field delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Enable or disable the leading byte order mark.
    pub fn with_bom(mut self, write_bom: bool) -> Self {
        self.write_bom = write_bom;
        self
    }

    /// Reject delimiters that would make rows ambiguous.
    pub fn validated(self) -> Result<Self, CatalogError> {
        if matches!(self.delimiter, b'"' | b'\n' | b'\r') || !self.delimiter.is_ascii() {
            return Err(CatalogError::Configuration(format!(
                "unsupported delimiter byte 0x{:02x}",
                self.delimiter
            )));
        }
        Ok(self)
    }
}
