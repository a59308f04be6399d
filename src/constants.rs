use crate::fields::FieldKey;

/// Constants used by catalog field lookups and well-known field names.
pub mod fields {
    use super::FieldKey;

    /// Separator between segments of a nested field path (for example `unlockRequirements.userLevel`).
    pub const FIELD_PATH_DELIMITER: char = '.';
    /// Identifier field of recipe records.
    pub const FIELD_RECIPE_ID: FieldKey = FieldKey::new("recipeId");
    /// Identifier field of plant template records.
    pub const FIELD_PLANT_ID: FieldKey = FieldKey::new("plantId");
    /// Grouping field shared by recipes and plant templates.
    pub const FIELD_CATEGORY: FieldKey = FieldKey::new("category");
}

/// Constants used by catalog persistence and aggregation.
pub mod catalog {
    /// Group bucket for records that lack the grouping field or hold `null`.
    pub const UNKNOWN_GROUP: &str = "unknown";
    /// File extension accepted when a batch is loaded from a directory.
    pub const BATCH_FILE_EXTENSION: &str = "json";
    /// Indentation used when serializing catalogs.
    pub const JSON_INDENT: &[u8] = b"  ";
    /// Mode requested for newly created output files, before the umask.
    pub const NEW_FILE_MODE: u32 = 0o666;
}

/// Constants used by the index-definition table emitter.
pub mod index_table {
    /// Fixed header row: collection, index, fields, sort order, unique, priority, description, purpose.
    pub const HEADER: [&str; 8] = [
        "集合名称",
        "索引名称",
        "索引字段",
        "字段排序",
        "唯一索引",
        "优先级",
        "说明",
        "用途",
    ];
    /// Default field delimiter.
    pub const DEFAULT_DELIMITER: u8 = b',';
    /// UTF-8 byte order mark written ahead of the header when enabled.
    pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
    /// Uniqueness labels that mark an index as unique (compared case-insensitively).
    pub const UNIQUE_LABELS: [&str; 4] = ["是", "true", "yes", "1"];
}
