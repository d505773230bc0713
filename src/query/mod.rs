//! Query parameters derived from a grid read request.
//!
//! [`translate`] converts a [`crate::ReadRequest`] into [`QueryParameters`],
//! delegating each filter condition to the operator table in [`operator`].
//! The parameters serialize to the variables map of the outbound query:
//!
//! ```text
//! { "start": 0, "size": 2,
//!   "sorts":   [{ "fieldId": "price", "ascending": false }],
//!   "filters": [{ "type": "RANGE", "fieldId": "price", "min": "80" }] }
//! ```

mod clause;
mod operator;
mod translate;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use clause::{FilterClause, SortClause};
pub use operator::{coerce_value, map_condition, FilterOperator};
pub use translate::translate;

/// Normalized paging, sort and filter parameters for one query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParameters {
    pub start: i64,
    pub size: i64,
    #[serde(default)]
    pub sorts: Vec<SortClause>,
    #[serde(default)]
    pub filters: Vec<FilterClause>,
}

impl QueryParameters {
    /// The variables map sent alongside the query document.
    pub fn to_variables(&self) -> Value {
        serde_json::json!({
            "start": self.start,
            "size": self.size,
            "sorts": self.sorts,
            "filters": self.filters,
        })
    }
}
