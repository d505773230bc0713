//! Test doubles: a scripted client whose completions the test controls, and
//! a client that always answers with one fixed payload.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use grid_source::{ClientError, Field, InMemoryQueryClient, QueryClient, QueryRequest, QueryResponse};
use serde_json::{json, Value};
use tokio::sync::oneshot;

pub type Reply = Result<QueryResponse, ClientError>;

/// Each query waits for a reply the test sends through a scripted channel.
///
/// Queries take scripted replies in the order they arrive.
#[derive(Default)]
pub struct ScriptedClient {
    pending: Mutex<VecDeque<oneshot::Receiver<Reply>>>,
    requests: Mutex<Vec<QueryRequest>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the reply for the next query; send on the returned channel to complete it.
    pub fn script(&self) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().unwrap().push_back(rx);
        tx
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl QueryClient for ScriptedClient {
    async fn query(&self, request: QueryRequest) -> Result<QueryResponse, ClientError> {
        self.requests.lock().unwrap().push(request);
        let reply = self.pending.lock().unwrap().pop_front();
        match reply {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(ClientError::Unavailable("script dropped".into()))),
            None => Err(ClientError::Unavailable("no scripted reply".into())),
        }
    }
}

/// Answers every query with the same response.
pub struct StaticClient {
    reply: Reply,
}

impl StaticClient {
    pub fn ok(data: Value) -> Self {
        let data = match data {
            Value::Object(map) => map,
            other => panic!("response data must be an object, got {other}"),
        };
        Self {
            reply: Ok(QueryResponse { data }),
        }
    }
}

#[async_trait]
impl QueryClient for StaticClient {
    async fn query(&self, _request: QueryRequest) -> Result<QueryResponse, ClientError> {
        self.reply.clone()
    }
}

/// A single-row result under the `data` root field, tagged by `label`.
pub fn page_response(label: &str, total: i64) -> QueryResponse {
    QueryResponse::new(
        "data",
        json!({
            "fields": [{ "id": "label", "name": "Label", "fieldType": "STRING" }],
            "rows": [{ "values": [label] }],
            "totalSize": total
        }),
    )
}

pub fn prices() -> InMemoryQueryClient {
    InMemoryQueryClient::new(
        vec![
            Field::new("ticker", "Ticker", "STRING"),
            Field::new("price", "Price", "DOUBLE"),
            Field::new("sector", "Sector", "STRING"),
        ],
        vec![
            vec![json!("AAA"), json!(64.5), json!("energy")],
            vec![json!("BBB"), json!(80), json!("tech")],
            vec![json!("CCC"), json!(132.25), json!("tech")],
            vec![json!("DDD"), json!(91), json!(null)],
            vec![json!("EEE"), json!(79.99), json!("retail")],
        ],
    )
}
