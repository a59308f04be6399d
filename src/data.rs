use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::fields::FieldPath;

pub use crate::types::{FieldName, RecordKey};

/// One structured catalog entry: an open-ended mapping from field name to value.
///
/// Field order is preserved through load and write.
pub type Record = Map<FieldName, Value>;

/// Ordered sequence of records persisted as one JSON document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    records: Vec<Record>,
}

impl Catalog {
    /// Wrap an ordered list of records.
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Build a catalog from a parsed JSON document.
    ///
    /// The document must be an array whose elements are all objects; the error
    /// string names the first element that is not.
    pub fn from_value(value: Value) -> Result<Self, String> {
        let Value::Array(items) = value else {
            return Err(format!("expected a top-level array, found {}", kind_of(&value)));
        };
        let mut records = Vec::with_capacity(items.len());
        for (idx, item) in items.into_iter().enumerate() {
            match item {
                Value::Object(record) => records.push(record),
                other => {
                    return Err(format!(
                        "element {idx} is {}, expected an object",
                        kind_of(&other)
                    ));
                }
            }
        }
        Ok(Self { records })
    }

    /// Records in catalog order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Consume the catalog and return its records.
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the catalog holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate records in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Identifier text of every record that carries one, in order.
    pub fn keys<'a>(&'a self, key: &'a FieldPath) -> impl Iterator<Item = RecordKey> + 'a {
        self.records.iter().filter_map(move |record| key.text(record))
    }

    pub(crate) fn extend(&mut self, records: impl IntoIterator<Item = Record>) {
        self.records.extend(records);
    }
}

impl From<Vec<Record>> for Catalog {
    fn from(records: Vec<Record>) -> Self {
        Self::new(records)
    }
}

impl FromIterator<Record> for Catalog {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for Catalog {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
