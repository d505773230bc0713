//! Read requests as a grid widget issues them.
//!
//! A grid asks for one page at a time, described by an offset (`skip`), a page
//! size (`take`), an ordered sort list and an optional filter tree:
//!
//! ```json
//! {
//!   "skip": 0,
//!   "take": 2,
//!   "sort": [{ "field": "price", "dir": "desc" }],
//!   "filter": { "logic": "and", "filters": [
//!     { "field": "price", "operator": "gte", "value": 80 }
//!   ]}
//! }
//! ```
//!
//! These types only model the request. Turning it into query parameters is
//! the job of [`crate::query::translate`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TranslationError;

/// The sort token that means ascending. Every other token means descending.
pub const ASCENDING: &str = "asc";

/// One page request from the grid. Immutable for the duration of a read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadRequest {
    #[serde(default)]
    pub skip: i64,
    #[serde(default)]
    pub take: i64,
    #[serde(default)]
    pub sort: Vec<SortDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterNode>,
}

impl ReadRequest {
    pub fn new(skip: i64, take: i64) -> Self {
        Self {
            skip,
            take,
            ..Self::default()
        }
    }

    /// Append a sort entry. Uses builder pattern.
    pub fn sort_by(mut self, field: impl Into<String>, direction: impl Into<String>) -> Self {
        self.sort.push(SortDescriptor {
            field: Some(field.into()),
            direction: direction.into(),
        });
        self
    }

    /// Append a condition to the top-level `and` group, creating it if needed.
    pub fn filter_by(mut self, condition: FilterCondition) -> Self {
        let node = FilterNode::Condition(condition);
        let group = match self.filter.take() {
            Some(FilterNode::Group(mut group)) if group.logic() == Ok(Logic::And) => {
                group.filters.push(node);
                group
            }
            Some(existing) => FilterGroup::and(vec![existing, node]),
            None => FilterGroup::and(vec![node]),
        };
        self.filter = Some(FilterNode::Group(group));
        self
    }
}

/// One sort entry. The grid spells the direction key `dir`.
///
/// `field` is optional so an entry missing it decodes and is then rejected
/// with a [`TranslationError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, alias = "dir")]
    pub direction: String,
}

impl SortDescriptor {
    pub fn is_ascending(&self) -> bool {
        self.direction == ASCENDING
    }
}

/// A node of the grid's filter tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterNode {
    Group(FilterGroup),
    Condition(FilterCondition),
}

/// A list of child nodes joined by `logic` (`and` when absent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logic: Option<String>,
    pub filters: Vec<FilterNode>,
}

impl FilterGroup {
    pub fn and(filters: Vec<FilterNode>) -> Self {
        Self {
            logic: Some("and".into()),
            filters,
        }
    }

    pub fn or(filters: Vec<FilterNode>) -> Self {
        Self {
            logic: Some("or".into()),
            filters,
        }
    }

    /// How the children combine. An absent `logic` means `and`.
    pub fn logic(&self) -> Result<Logic, TranslationError> {
        match self.logic.as_deref() {
            None => Ok(Logic::And),
            Some(token) if token.eq_ignore_ascii_case("and") => Ok(Logic::And),
            Some(token) if token.eq_ignore_ascii_case("or") => Ok(Logic::Or),
            Some(token) => Err(TranslationError::UnknownLogic {
                logic: token.to_string(),
            }),
        }
    }
}

/// The join of a [`FilterGroup`]'s children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Logic {
    And,
    Or,
}

/// A single `{field, operator, value}` filter.
///
/// `field` and `operator` are optional here so a request missing them
/// decodes and is then rejected with a [`TranslationError`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl FilterCondition {
    pub fn new(field: impl Into<String>, operator: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: Some(field.into()),
            operator: Some(operator.into()),
            value: Some(value.into()),
        }
    }

    /// A condition whose operator takes no value (`isempty`, `isnotempty`).
    pub fn unary(field: impl Into<String>, operator: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            operator: Some(operator.into()),
            value: None,
        }
    }
}

impl FilterNode {
    /// Flatten the tree depth-first into its conditions, in request order.
    ///
    /// An `or` group with more than one child has no conjunctive equivalent
    /// and is rejected. An `or` group with a single child is that child.
    pub fn conditions(&self) -> Result<Vec<&FilterCondition>, TranslationError> {
        let mut out = Vec::new();
        self.collect(&mut out)?;
        Ok(out)
    }

    fn collect<'a>(&'a self, out: &mut Vec<&'a FilterCondition>) -> Result<(), TranslationError> {
        match self {
            FilterNode::Condition(condition) => out.push(condition),
            FilterNode::Group(group) => {
                if group.logic()? == Logic::Or && group.filters.len() > 1 {
                    return Err(TranslationError::DisjunctionUnsupported {
                        children: group.filters.len(),
                    });
                }
                for child in &group.filters {
                    child.collect(out)?;
                }
            }
        }
        Ok(())
    }
}
