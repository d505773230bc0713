//! Normalized sort and filter clauses as the data service receives them.

use serde::{Deserialize, Serialize};

/// One sort key. `ascending` is false for every direction but `asc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortClause {
    pub field_id: String,
    pub ascending: bool,
}

/// One filter condition, tagged on the wire by `type`.
///
/// Every value is already in string form; the field's real type lives in
/// the dataset schema on the service side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum FilterClause {
    Equals {
        field_id: String,
        value: String,
        negate: bool,
    },
    Empty {
        field_id: String,
        negate: bool,
    },
    Substring {
        field_id: String,
        value: String,
    },
    Range {
        field_id: String,
        min: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<String>,
    },
}

impl FilterClause {
    pub fn field_id(&self) -> &str {
        match self {
            FilterClause::Equals { field_id, .. }
            | FilterClause::Empty { field_id, .. }
            | FilterClause::Substring { field_id, .. }
            | FilterClause::Range { field_id, .. } => field_id,
        }
    }

    /// The wire tag of this clause.
    pub fn kind(&self) -> &'static str {
        match self {
            FilterClause::Equals { .. } => "EQUALS",
            FilterClause::Empty { .. } => "EMPTY",
            FilterClause::Substring { .. } => "SUBSTRING",
            FilterClause::Range { .. } => "RANGE",
        }
    }
}
