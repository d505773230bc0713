//! Query Client - the outbound capability the adapter runs queries through.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                 QueryExecutor (per dataset)                  │
//! │  - builds QueryRequest { document, variables, fetch_policy } │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     QueryClient trait                        │
//! │  query(request) -> { data: { <root field>: QueryResult } }   │
//! └──────────────────────────────────────────────────────────────┘
//!          │                                   │
//!          ▼                                   ▼
//! ┌────────────────────┐            ┌─────────────────────────┐
//! │ InMemoryQueryClient│            │ GraphQlHttpClient       │
//! │ (included)         │            │ (feature "http")        │
//! └────────────────────┘            └─────────────────────────┘
//! ```
//!
//! Connection setup, authentication and transport-level retries belong to
//! the client implementation, never to the adapter.

mod in_memory;

#[cfg(feature = "http")]
mod http;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub use in_memory::InMemoryQueryClient;

#[cfg(feature = "http")]
pub use http::GraphQlHttpClient;

/// Root field name of the data query when none is configured.
pub const DEFAULT_ROOT_FIELD: &str = "data";

/// Whether `name` is a valid GraphQL name (`[_A-Za-z][_0-9A-Za-z]*`).
pub fn is_graphql_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_ascii_alphabetic() => {
            chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        }
        _ => false,
    }
}

/// Opaque identity of the remote dataset. Supplied once per adapter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetId(String);

impl DatasetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether a query may be answered from a client-side cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FetchPolicy {
    /// Always round-trip to the service.
    NetworkOnly,
    CacheFirst,
}

/// The data query for one dataset, built once and reused for every read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDocument {
    root_field: String,
    text: String,
}

impl QueryDocument {
    pub const OPERATION_NAME: &'static str = "DataQuery";

    /// Build the paged data query against `dataset`, answered under `root_field`.
    pub fn data_query(dataset: &DatasetId, root_field: &str) -> Self {
        // JSON string escaping is valid GraphQL string escaping.
        let dataset_literal =
            serde_json::to_string(dataset.as_str()).unwrap_or_else(|_| format!("\"{}\"", dataset));
        let text = format!(
            r#"query {op}($size: Long = 100, $start: Long = 0, $filters: [filter!], $sorts: [sort!]) {{
  {root}(
    dataSetId: {dataset},
    start: $start,
    size: $size,
    modifiers: [{{ filters: $filters, sorts: $sorts }}]
  ) {{
    rows {{ values }}
    fields {{ id name fieldType }}
    totalSize
  }}
}}"#,
            op = Self::OPERATION_NAME,
            root = root_field,
            dataset = dataset_literal,
        );
        Self {
            root_field: root_field.to_string(),
            text,
        }
    }

    /// The field the result is keyed under in the response's `data` map.
    pub fn root_field(&self) -> &str {
        &self.root_field
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// One query as handed to a [`QueryClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub document: QueryDocument,
    pub variables: Value,
    pub fetch_policy: FetchPolicy,
}

/// A successful response: results keyed by root field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl QueryResponse {
    pub fn new(root_field: impl Into<String>, result: Value) -> Self {
        let mut data = Map::new();
        data.insert(root_field.into(), result);
        Self { data }
    }

    /// Remove and return the result stored under `root_field`.
    pub fn take(&mut self, root_field: &str) -> Option<Value> {
        self.data.remove(root_field)
    }
}

/// Error type for query client operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The request never reached the service or the connection failed.
    #[error("network error: {0}")]
    Network(String),
    /// The service answered with a non-success status.
    #[error("data service returned status {status}: {body}")]
    Status { status: u16, body: String },
    /// The service executed the query and reported errors.
    #[error("data service reported errors: {}", .0.join("; "))]
    GraphQl(Vec<String>),
    /// The response could not be decoded into the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),
    /// The client cannot issue queries right now.
    #[error("query client unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

/// Execute-a-query capability.
///
/// Implementations are long-lived and shared; the adapter never reconfigures
/// a client per request.
#[async_trait]
pub trait QueryClient: Send + Sync {
    async fn query(&self, request: QueryRequest) -> Result<QueryResponse, ClientError>;
}

#[async_trait]
impl<C: QueryClient + ?Sized> QueryClient for Arc<C> {
    async fn query(&self, request: QueryRequest) -> Result<QueryResponse, ClientError> {
        (**self).query(request).await
    }
}
