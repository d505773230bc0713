//! In-memory query client for testing and single-process scenarios.
//!
//! Holds one columnar table and answers data queries against it the way the
//! remote service would: filter clauses, then sorts, then paging, with
//! `totalSize` reporting the filtered row count.

use std::cmp::Ordering;
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use serde_json::Value;

use super::{ClientError, QueryClient, QueryRequest, QueryResponse};
use crate::query::{FilterClause, QueryParameters, SortClause};
use crate::result::{Field, QueryResult, Row};

/// In-memory stand-in for the remote data service.
///
/// Cloning shares the table, the request log and the failure switch.
///
/// ## Example
///
/// ```
/// use grid_source::{Field, InMemoryQueryClient};
/// use serde_json::json;
///
/// let client = InMemoryQueryClient::new(
///     vec![Field::new("name", "Name", "STRING"), Field::new("price", "Price", "DOUBLE")],
///     vec![vec![json!("apple"), json!(1.5)], vec![json!("pear"), json!(2.0)]],
/// );
/// assert_eq!(client.row_count(), 2);
/// ```
#[derive(Clone)]
pub struct InMemoryQueryClient {
    fields: Arc<Vec<Field>>,
    rows: Arc<RwLock<Vec<Vec<Value>>>>,
    requests: Arc<Mutex<Vec<QueryRequest>>>,
    failure: Arc<Mutex<Option<ClientError>>>,
}

impl InMemoryQueryClient {
    pub fn new(fields: Vec<Field>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            fields: Arc::new(fields),
            rows: Arc::new(RwLock::new(rows)),
            requests: Arc::new(Mutex::new(Vec::new())),
            failure: Arc::new(Mutex::new(None)),
        }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn row_count(&self) -> usize {
        self.rows.read().map(|rows| rows.len()).unwrap_or(0)
    }

    /// Append a row to the table.
    pub fn push_row(&self, values: Vec<Value>) -> Result<(), ClientError> {
        self.rows
            .write()
            .map_err(|_| ClientError::Unavailable("table lock poisoned".into()))?
            .push(values);
        Ok(())
    }

    /// Make every following query fail with `err` until [`Self::recover`].
    pub fn fail_with(&self, err: ClientError) {
        if let Ok(mut failure) = self.failure.lock() {
            *failure = Some(err);
        }
    }

    pub fn recover(&self) {
        if let Ok(mut failure) = self.failure.lock() {
            *failure = None;
        }
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<QueryRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    fn column(&self, field_id: &str) -> Result<usize, ClientError> {
        self.fields
            .iter()
            .position(|field| field.id == field_id)
            .ok_or_else(|| ClientError::GraphQl(vec![format!("unknown field '{}'", field_id)]))
    }

    fn evaluate(&self, params: &QueryParameters) -> Result<QueryResult, ClientError> {
        let filters = params
            .filters
            .iter()
            .map(|clause| Ok((self.column(clause.field_id())?, clause)))
            .collect::<Result<Vec<_>, ClientError>>()?;
        let sorts = params
            .sorts
            .iter()
            .map(|sort| Ok((self.column(&sort.field_id)?, sort)))
            .collect::<Result<Vec<_>, ClientError>>()?;

        let rows = self
            .rows
            .read()
            .map_err(|_| ClientError::Unavailable("table lock poisoned".into()))?;

        let mut matched: Vec<&Vec<Value>> = rows
            .iter()
            .filter(|row| {
                filters.iter().all(|(column, clause)| {
                    clause_matches(row.get(*column).unwrap_or(&Value::Null), clause)
                })
            })
            .collect();

        matched.sort_by(|a, b| compare_rows(a, b, &sorts));

        let total_size = matched.len() as i64;
        let start = params.start.max(0) as usize;
        let size = params.size.max(0) as usize;

        Ok(QueryResult {
            fields: self.fields.as_ref().clone(),
            rows: matched
                .into_iter()
                .skip(start)
                .take(size)
                .map(|values| Row::new(values.clone()))
                .collect(),
            total_size,
        })
    }
}

#[async_trait]
impl QueryClient for InMemoryQueryClient {
    async fn query(&self, request: QueryRequest) -> Result<QueryResponse, ClientError> {
        self.requests
            .lock()
            .map_err(|_| ClientError::Unavailable("request log poisoned".into()))?
            .push(request.clone());

        if let Some(err) = self
            .failure
            .lock()
            .map_err(|_| ClientError::Unavailable("failure switch poisoned".into()))?
            .clone()
        {
            return Err(err);
        }

        let params: QueryParameters = serde_json::from_value(request.variables)?;
        let result = self.evaluate(&params)?;
        Ok(QueryResponse::new(
            request.document.root_field(),
            serde_json::to_value(result)?,
        ))
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        _ => compare_text(&text(a), &text(b)),
    }
}

// Numeric when both sides parse as numbers, lexical otherwise.
fn compare_text(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.cmp(b),
    }
}

fn compare_rows(a: &[Value], b: &[Value], sorts: &[(usize, &SortClause)]) -> Ordering {
    for (column, sort) in sorts {
        let ordering = compare_values(
            a.get(*column).unwrap_or(&Value::Null),
            b.get(*column).unwrap_or(&Value::Null),
        );
        let ordering = if sort.ascending {
            ordering
        } else {
            ordering.reverse()
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn clause_matches(cell: &Value, clause: &FilterClause) -> bool {
    match clause {
        FilterClause::Equals { value, negate, .. } => (text(cell) == *value) != *negate,
        FilterClause::Empty { negate, .. } => text(cell).is_empty() != *negate,
        FilterClause::Substring { value, .. } => text(cell)
            .to_lowercase()
            .contains(&value.to_lowercase()),
        FilterClause::Range { min, max, .. } => {
            if cell.is_null() {
                return false;
            }
            let cell = text(cell);
            compare_text(&cell, min) != Ordering::Less
                && max
                    .as_deref()
                    .map_or(true, |max| compare_text(&cell, max) != Ordering::Greater)
        }
    }
}
