use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::QueryResult;
use crate::error::AdapterError;

/// Key under which a record carries its position within the page.
pub const ROW_INDEX_KEY: &str = "_rowIndex";

/// One grid row: field id → value, plus `_rowIndex`.
///
/// `_rowIndex` is the zero-based position in the current page, not a stable
/// identity; it is regenerated on every read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GridRecord(Map<String, Value>);

impl GridRecord {
    pub fn get(&self, field_id: &str) -> Option<&Value> {
        self.0.get(field_id)
    }

    pub fn row_index(&self) -> Option<usize> {
        self.0
            .get(ROW_INDEX_KEY)
            .and_then(Value::as_u64)
            .map(|index| index as usize)
    }
}

/// The records of one page and the total row count across all pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridPage {
    pub data: Vec<GridRecord>,
    pub total: i64,
}

/// Reshape a columnar result into grid records.
///
/// Every row must carry exactly one value per field. The check runs over
/// all rows before any record is built, so a bad row never yields a
/// partial page.
pub fn reshape(result: QueryResult) -> Result<GridPage, AdapterError> {
    let expected = result.fields.len();
    if let Some((row, actual)) = result
        .rows
        .iter()
        .map(|r| r.values.len())
        .enumerate()
        .find(|(_, width)| *width != expected)
    {
        tracing::error!(row, expected, actual, "query result row width mismatch");
        return Err(AdapterError::ProtocolIntegrity {
            row,
            expected,
            actual,
        });
    }

    let QueryResult {
        fields,
        rows,
        total_size,
    } = result;

    let data = rows
        .into_iter()
        .enumerate()
        .map(|(index, row)| {
            let mut record: Map<String, Value> = fields
                .iter()
                .map(|field| field.id.clone())
                .zip(row.values)
                .collect();
            record.insert(ROW_INDEX_KEY.to_string(), Value::from(index));
            GridRecord(record)
        })
        .collect();

    Ok(GridPage {
        data,
        total: total_size,
    })
}
