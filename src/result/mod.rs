//! Columnar query results and their row-oriented grid form.
//!
//! The data service answers with a field list and rows of positional values:
//!
//! ```json
//! { "fields": [{ "id": "a", "name": "A", "fieldType": "LONG" }, { "id": "b", ... }],
//!   "rows": [{ "values": [1, 2] }],
//!   "totalSize": 40 }
//! ```
//!
//! [`reshape`] pairs each value with its field id and produces a
//! [`GridPage`] the grid can render directly.

mod reshape;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub use reshape::{reshape, GridPage, GridRecord, ROW_INDEX_KEY};

/// One column of a query result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// The type declared by the dataset schema (e.g. `STRING`, `DOUBLE`).
    #[serde(rename = "fieldType", alias = "type", default)]
    pub field_type: String,
}

impl Field {
    pub fn new(id: impl Into<String>, name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            field_type: field_type.into(),
        }
    }
}

/// One row; `values[k]` belongs to `fields[k]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    #[serde(default, deserialize_with = "null_as_default")]
    pub values: Vec<Value>,
}

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }
}

/// The payload of one data query.
///
/// `fields` and `totalSize` are required; a missing or null `rows` list
/// means an empty page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub fields: Vec<Field>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rows: Vec<Row>,
    #[serde(rename = "totalSize")]
    pub total_size: i64,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
