//! Grid-to-query adapter.
//!
//! Takes the paged, sorted and filtered read requests a grid widget issues,
//! runs each one as a single query against a columnar data service, and
//! reshapes the columnar answer into row records the grid can render.
//!
//! ```ignore
//! use grid_source::{DatasetId, GridDataSource, InMemoryQueryClient, ReadRequest};
//!
//! let source = GridDataSource::new(client, DatasetId::new("dataset_prices"));
//! let page = source.fetch_page(&ReadRequest::new(0, 100)).await?;
//! ```

pub mod client;
pub mod config;
pub mod datasource;
mod error;
pub mod executor;
pub mod query;
pub mod request;
pub mod result;

pub use client::{
    ClientError, DatasetId, FetchPolicy, InMemoryQueryClient, QueryClient, QueryDocument,
    QueryRequest, QueryResponse,
};
pub use config::{AdapterConfig, ConfigError};
pub use datasource::{DataSourceOptions, FieldKind, GridDataSource, ReadOptions, ReadOutcome};
pub use error::{AdapterError, TranslationError};
pub use executor::QueryExecutor;
pub use query::{translate, FilterClause, FilterOperator, QueryParameters, SortClause};
pub use request::{FilterCondition, FilterGroup, FilterNode, Logic, ReadRequest, SortDescriptor};
pub use result::{reshape, Field, GridPage, GridRecord, QueryResult, Row};

#[cfg(feature = "http")]
pub use client::GraphQlHttpClient;
