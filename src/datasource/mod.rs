//! Grid data source - the read transport a grid widget calls into.
//!
//! Each read runs the same pipeline:
//!
//! ```text
//! ReadRequest ──translate──▶ QueryParameters ──execute──▶ QueryResult ──reshape──▶ GridPage
//! ```
//!
//! ## Sequencing
//!
//! A grid fires a new read on every page, sort or filter change, and slow
//! queries can complete out of order. [`GridDataSource::read_page`] tags each
//! read with a monotonically increasing token and discards a completion whose
//! token is no longer the latest, so a superseded page never overwrites a
//! newer one. [`GridDataSource::fetch_page`] skips sequencing for callers that
//! own their own reply channel (e.g. one HTTP request per read).
//!
//! ## Example
//!
//! ```ignore
//! let source = GridDataSource::new(client, DatasetId::new("dataset_prices"));
//!
//! source
//!     .read(ReadOptions {
//!         data: ReadRequest::new(0, 100).sort_by("price", "desc"),
//!         success: |page| grid.render(page),
//!         error: |err| grid.show_error(err),
//!     })
//!     .await;
//! ```

mod options;

// HTTP transport (requires "http" feature)
#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::{router, serve};

use std::sync::atomic::{AtomicU64, Ordering};

use crate::client::{DatasetId, QueryClient, DEFAULT_ROOT_FIELD};
use crate::config::AdapterConfig;
use crate::error::AdapterError;
use crate::executor::QueryExecutor;
use crate::query::translate;
use crate::request::ReadRequest;
use crate::result::{reshape, GridPage};

pub use options::{DataSourceOptions, FieldKind, FieldSpec, Schema, SchemaModel};

/// The grid transport read call: a request plus its two completion callbacks.
pub struct ReadOptions<S, E> {
    pub data: ReadRequest,
    pub success: S,
    pub error: E,
}

/// How a sequenced read ended.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome {
    /// The page for the latest read.
    Page(GridPage),
    /// A newer read was issued while this one was in flight; its result was dropped.
    Superseded { token: u64, latest: u64 },
}

impl ReadOutcome {
    pub fn into_page(self) -> Option<GridPage> {
        match self {
            ReadOutcome::Page(page) => Some(page),
            ReadOutcome::Superseded { .. } => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, ReadOutcome::Superseded { .. })
    }
}

/// Adapter between a grid widget and a columnar data service.
///
/// The only state kept across reads is the latest request token; the client
/// handle is shared and never reconfigured.
pub struct GridDataSource<C> {
    executor: QueryExecutor<C>,
    options: DataSourceOptions,
    latest: AtomicU64,
}

impl<C: QueryClient> GridDataSource<C> {
    pub fn new(client: C, dataset: DatasetId) -> Self {
        Self::with_root_field(client, dataset, DEFAULT_ROOT_FIELD)
    }

    /// A data source whose query result is keyed under `root_field`.
    pub fn with_root_field(client: C, dataset: DatasetId, root_field: &str) -> Self {
        Self {
            executor: QueryExecutor::new(client, dataset, root_field),
            options: DataSourceOptions::default(),
            latest: AtomicU64::new(0),
        }
    }

    pub fn from_config(client: C, config: &AdapterConfig) -> Self {
        Self::with_root_field(client, config.dataset(), &config.query_name)
            .with_options(config.data_source_options())
    }

    /// Replace the grid-side declaration. Uses builder pattern.
    pub fn with_options(mut self, options: DataSourceOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &DataSourceOptions {
        &self.options
    }

    pub fn dataset(&self) -> &DatasetId {
        self.executor.dataset()
    }

    pub fn executor(&self) -> &QueryExecutor<C> {
        &self.executor
    }

    /// The token of the most recently issued sequenced read (0 before any).
    pub fn latest_token(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    /// Translate, execute and reshape one read, without sequencing.
    pub async fn fetch_page(&self, request: &ReadRequest) -> Result<GridPage, AdapterError> {
        let params = translate(request)?;
        let result = self.executor.execute(&params).await?;
        reshape(result)
    }

    /// Run one read; its result is kept only if no newer read was issued meanwhile.
    ///
    /// Translation errors are returned immediately. A failure that arrives
    /// after the read was superseded is dropped along with it.
    pub async fn read_page(&self, request: &ReadRequest) -> Result<ReadOutcome, AdapterError> {
        let token = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let params = translate(request)?;

        tracing::debug!(
            dataset = %self.dataset(),
            token,
            start = params.start,
            size = params.size,
            "grid read issued"
        );

        let result = self.executor.execute(&params).await;

        let latest = self.latest_token();
        if latest != token {
            tracing::warn!(
                dataset = %self.dataset(),
                token,
                latest,
                failed = result.is_err(),
                "discarding superseded grid read"
            );
            return Ok(ReadOutcome::Superseded { token, latest });
        }

        Ok(ReadOutcome::Page(reshape(result?)?))
    }

    /// Grid transport entry point.
    ///
    /// Calls `success` with the page of a current read and `error` with the
    /// failure of a current read. A superseded read calls neither.
    pub async fn read<S, E>(&self, options: ReadOptions<S, E>)
    where
        S: FnOnce(GridPage),
        E: FnOnce(AdapterError),
    {
        let ReadOptions {
            data,
            success,
            error,
        } = options;

        match self.read_page(&data).await {
            Ok(ReadOutcome::Page(page)) => success(page),
            Ok(ReadOutcome::Superseded { .. }) => {}
            Err(err) => {
                tracing::debug!(dataset = %self.dataset(), error = %err, "grid read failed");
                error(err)
            }
        }
    }
}
