//! The grid operator vocabulary and its mapping onto filter clauses.
//!
//! | operator     | clause    | negate |
//! |--------------|-----------|--------|
//! | `eq`         | Equals    | false  |
//! | `neq`        | Equals    | true   |
//! | `isempty`    | Empty     | false  |
//! | `isnotempty` | Empty     | true   |
//! | `contains`   | Substring |        |
//! | `gte`        | Range     | min only |
//!
//! Anything else (`gt`, `lt`, `lte`, `startswith`, ...) is rejected with
//! [`AdapterError::UnsupportedOperator`]. Each condition yields exactly one
//! clause; a `gte`/`lte` pair on the same field is not merged into a
//! two-sided range.

use std::fmt;
use std::str::FromStr;

use serde_json::{Number, Value};

use super::clause::FilterClause;
use crate::error::{AdapterError, TranslationError};
use crate::request::FilterCondition;

/// Every operator the data service can express.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOperator {
    Eq,
    Neq,
    IsEmpty,
    IsNotEmpty,
    Contains,
    Gte,
}

impl FilterOperator {
    pub const ALL: [FilterOperator; 6] = [
        FilterOperator::Eq,
        FilterOperator::Neq,
        FilterOperator::IsEmpty,
        FilterOperator::IsNotEmpty,
        FilterOperator::Contains,
        FilterOperator::Gte,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "eq",
            FilterOperator::Neq => "neq",
            FilterOperator::IsEmpty => "isempty",
            FilterOperator::IsNotEmpty => "isnotempty",
            FilterOperator::Contains => "contains",
            FilterOperator::Gte => "gte",
        }
    }

    /// Whether the clause for this operator carries the condition's value.
    pub fn takes_value(&self) -> bool {
        !matches!(self, FilterOperator::IsEmpty | FilterOperator::IsNotEmpty)
    }

    /// Build the clause for `field_id`. `value` must already be coerced and
    /// is ignored by the empty checks.
    pub fn clause(&self, field_id: String, value: String) -> FilterClause {
        match self {
            FilterOperator::Eq => FilterClause::Equals {
                field_id,
                value,
                negate: false,
            },
            FilterOperator::Neq => FilterClause::Equals {
                field_id,
                value,
                negate: true,
            },
            FilterOperator::IsEmpty => FilterClause::Empty {
                field_id,
                negate: false,
            },
            FilterOperator::IsNotEmpty => FilterClause::Empty {
                field_id,
                negate: true,
            },
            FilterOperator::Contains => FilterClause::Substring { field_id, value },
            FilterOperator::Gte => FilterClause::Range {
                field_id,
                min: value,
                max: None,
            },
        }
    }
}

impl FromStr for FilterOperator {
    type Err = AdapterError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        FilterOperator::ALL
            .into_iter()
            .find(|op| op.as_str() == token)
            .ok_or_else(|| AdapterError::UnsupportedOperator(token.to_string()))
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map the `index`-th condition of a request onto its clause.
pub fn map_condition(index: usize, condition: &FilterCondition) -> Result<FilterClause, AdapterError> {
    let field = condition
        .field
        .as_deref()
        .filter(|field| !field.is_empty())
        .ok_or(TranslationError::MissingField { index })?;
    let token = condition
        .operator
        .as_deref()
        .ok_or_else(|| TranslationError::MissingOperator {
            field: field.to_string(),
        })?;
    let operator: FilterOperator = token.parse()?;

    let value = if operator.takes_value() {
        coerce_value(field, operator, condition.value.as_ref())?
    } else {
        String::new()
    };

    Ok(operator.clause(field.to_string(), value))
}

/// The string form the data service expects for a filter value.
///
/// Strings pass through untouched, booleans print as `true`/`false`, and
/// numbers print in canonical decimal form.
pub fn coerce_value(
    field: &str,
    operator: FilterOperator,
    value: Option<&Value>,
) -> Result<String, TranslationError> {
    match value {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(canonical_number(n)),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        None | Some(Value::Null) => Err(TranslationError::MissingValue {
            field: field.to_string(),
            operator: operator.to_string(),
        }),
        Some(Value::Array(_)) | Some(Value::Object(_)) => Err(TranslationError::UnsupportedValue {
            field: field.to_string(),
        }),
    }
}

// Floats print the way the grid stringifies them: plain decimal without a
// trailing ".0" for 1e-6 <= |x| < 1e21, exponent form ("1e+21", "1e-7") outside.
fn canonical_number(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.is_finite() => canonical_float(f),
        _ => n.to_string(),
    }
}

fn canonical_float(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }
    let magnitude = f.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{f}");
    }
    let exponent = format!("{f:e}");
    match exponent.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
        _ => exponent,
    }
}
