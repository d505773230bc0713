//! Query Executor - one remote query per read.

use crate::client::{ClientError, DatasetId, FetchPolicy, QueryClient, QueryDocument, QueryRequest};
use crate::error::AdapterError;
use crate::query::QueryParameters;
use crate::result::QueryResult;

/// Issues data queries for one dataset through a shared [`QueryClient`].
///
/// Every query is sent with [`FetchPolicy::NetworkOnly`]. Nothing is cached,
/// deduplicated or retried here.
pub struct QueryExecutor<C> {
    client: C,
    dataset: DatasetId,
    document: QueryDocument,
}

impl<C: QueryClient> QueryExecutor<C> {
    pub fn new(client: C, dataset: DatasetId, root_field: &str) -> Self {
        let document = QueryDocument::data_query(&dataset, root_field);
        Self {
            client,
            dataset,
            document,
        }
    }

    pub fn dataset(&self) -> &DatasetId {
        &self.dataset
    }

    pub fn document(&self) -> &QueryDocument {
        &self.document
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Run one query and return the result found under the root field.
    pub async fn execute(&self, params: &QueryParameters) -> Result<QueryResult, AdapterError> {
        let request = QueryRequest {
            document: self.document.clone(),
            variables: params.to_variables(),
            fetch_policy: FetchPolicy::NetworkOnly,
        };

        tracing::debug!(
            dataset = %self.dataset,
            start = params.start,
            size = params.size,
            sorts = params.sorts.len(),
            filters = params.filters.len(),
            "issuing data query"
        );

        let result = self.client.query(request).await.and_then(|mut response| {
            let payload = response.take(self.document.root_field()).ok_or_else(|| {
                ClientError::Decode(format!(
                    "response has no '{}' result",
                    self.document.root_field()
                ))
            })?;
            Ok(serde_json::from_value::<QueryResult>(payload)?)
        });

        result.map_err(|err| {
            tracing::error!(dataset = %self.dataset, error = %err, "data query failed");
            AdapterError::Transport(err)
        })
    }
}
