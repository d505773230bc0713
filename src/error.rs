//! Error types shared by every stage of a grid read.

use thiserror::Error;

use crate::client::ClientError;

/// A grid read request that cannot be turned into query parameters.
///
/// Raised before any network call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslationError {
    /// A filter condition without a `field`.
    #[error("filter condition #{index} has no field")]
    MissingField { index: usize },
    /// A filter condition without an `operator`.
    #[error("filter condition on '{field}' has no operator")]
    MissingOperator { field: String },
    /// A value-bearing operator whose value is absent or null.
    #[error("filter '{operator}' on '{field}' requires a value")]
    MissingValue { field: String, operator: String },
    /// Arrays and objects have no string form the data service accepts.
    #[error("filter on '{field}' has a non-scalar value")]
    UnsupportedValue { field: String },
    /// A sort entry without a `field`.
    #[error("sort entry #{index} has no field")]
    MissingSortField { index: usize },
    /// A filter group whose `logic` is neither `and` nor `or`.
    #[error("filter group has unknown logic '{logic}'")]
    UnknownLogic { logic: String },
    /// An `or` group with more than one child; clauses are conjunctive.
    #[error("filter group with logic 'or' and {children} children cannot be expressed")]
    DisjunctionUnsupported { children: usize },
}

/// Every way a grid read can fail.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("invalid read request: {0}")]
    Translation(#[from] TranslationError),
    /// The filter operator is not in the operator table.
    #[error("unsupported filter operator: {0}")]
    UnsupportedOperator(String),
    /// The remote query was rejected or its payload could not be read.
    #[error("query failed: {0}")]
    Transport(#[from] ClientError),
    /// A result row whose width differs from the field list.
    #[error("row {row} has {actual} values but the result declares {expected} fields")]
    ProtocolIntegrity {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

impl AdapterError {
    /// Map this error to an HTTP-style status code.
    pub fn status_code(&self) -> u16 {
        match self {
            AdapterError::Translation(_) => 400,
            AdapterError::UnsupportedOperator(_) => 400,
            AdapterError::Transport(_) => 502,
            AdapterError::ProtocolIntegrity { .. } => 502,
        }
    }

    /// True when the request itself was at fault rather than the data service.
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            AdapterError::Translation(_) | AdapterError::UnsupportedOperator(_)
        )
    }
}
