/// Field name as authored in a record.
/// Examples: `recipeId`, `category`, `unlockRequirements.userLevel`
pub type FieldName = String;
/// Canonical text of a record identifier value.
/// Examples: `chinese_vegan_004`, `cactus_001`
pub type RecordKey = String;
/// Canonical text of a grouping value used in summaries.
/// Examples: `chinese_vegan`, `cactus`, `unknown`
pub type GroupKey = String;
/// Database collection name in an index definition.
/// Examples: `users`, `meals`, `daily_stats`
pub type CollectionName = String;
/// Index name within a collection.
/// Examples: `openId_unique`, `userId_mealDate_index`
pub type IndexName = String;
