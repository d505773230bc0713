//! GraphQL-over-HTTP query client.
//!
//! Requires the `http` feature. Posts `{ query, operationName, variables }`
//! as JSON and decodes the standard `{ data, errors }` envelope.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::{ClientError, FetchPolicy, QueryClient, QueryDocument, QueryRequest, QueryResponse};
use crate::config::AdapterConfig;

#[derive(Debug, Deserialize)]
struct GraphQlEnvelope {
    #[serde(default)]
    data: Option<Map<String, Value>>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    #[serde(default)]
    message: String,
}

/// Query client that talks to a GraphQL endpoint.
#[derive(Debug, Clone)]
pub struct GraphQlHttpClient {
    client: reqwest::Client,
    endpoint: String,
}

impl GraphQlHttpClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Build a client from adapter configuration, honouring `test_mode`.
    pub fn from_config(config: &AdapterConfig) -> Result<Self, ClientError> {
        Self::new(
            config.endpoint_url(),
            Duration::from_millis(config.timeout_ms),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn body(document: &QueryDocument, variables: &Value) -> Value {
        json!({
            "query": document.text(),
            "operationName": QueryDocument::OPERATION_NAME,
            "variables": variables,
        })
    }
}

#[async_trait]
impl QueryClient for GraphQlHttpClient {
    async fn query(&self, request: QueryRequest) -> Result<QueryResponse, ClientError> {
        let mut builder = self
            .client
            .post(&self.endpoint)
            .json(&Self::body(&request.document, &request.variables));
        if request.fetch_policy == FetchPolicy::NetworkOnly {
            builder = builder
                .header(CACHE_CONTROL, "no-cache")
                .header(PRAGMA, "no-cache");
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: GraphQlEnvelope = response
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))?;

        if !envelope.errors.is_empty() {
            return Err(ClientError::GraphQl(
                envelope.errors.into_iter().map(|e| e.message).collect(),
            ));
        }

        let data = envelope
            .data
            .ok_or_else(|| ClientError::Decode("response has neither data nor errors".into()))?;
        Ok(QueryResponse { data })
    }
}
