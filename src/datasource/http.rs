//! HTTP transport for a grid data source.
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Routes
//!
//! - `POST /read`: body is a grid read request; responds with `{ data, total }`.
//! - `GET /options`: the grid-side data-source declaration.
//! - `GET /health`: `{ "ok": true, "dataset": "<id>" }`.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use grid_source::{datasource, AdapterConfig, GraphQlHttpClient, GridDataSource};
//!
//! let config = AdapterConfig::load("grid_source.yaml")?;
//! let client = GraphQlHttpClient::from_config(&config)?;
//! let source = Arc::new(GridDataSource::from_config(client, &config));
//!
//! datasource::serve(source, "0.0.0.0:3000").await?;
//! ```

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use super::GridDataSource;
use crate::client::QueryClient;
use crate::request::ReadRequest;

/// Build an axum `Router` serving reads from the given data source.
pub fn router<C: QueryClient + 'static>(source: Arc<GridDataSource<C>>) -> Router {
    Router::new()
        .route("/health", get(health_handler::<C>))
        .route("/options", get(options_handler::<C>))
        .route("/read", post(read_handler::<C>))
        .with_state(source)
}

/// Serve the data source over HTTP at the given address (e.g. `"0.0.0.0:3000"`).
pub async fn serve<C: QueryClient + 'static>(
    source: Arc<GridDataSource<C>>,
    addr: &str,
) -> Result<(), std::io::Error> {
    let app = router(source);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr, "grid data source listening");
    axum::serve(listener, app).await
}

async fn health_handler<C: QueryClient + 'static>(
    State(source): State<Arc<GridDataSource<C>>>,
) -> impl IntoResponse {
    Json(json!({ "ok": true, "dataset": source.dataset().as_str() }))
}

async fn options_handler<C: QueryClient + 'static>(
    State(source): State<Arc<GridDataSource<C>>>,
) -> impl IntoResponse {
    Json(source.options().clone())
}

/// `POST /read`: each HTTP request has its own reply, so reads are not sequenced.
///
/// A body that is not a read request is answered with 400 and a JSON error,
/// like every other failure.
async fn read_handler<C: QueryClient + 'static>(
    State(source): State<Arc<GridDataSource<C>>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let input = match body {
        Ok(Json(input)) => input,
        Err(rejection) => return error_response(StatusCode::BAD_REQUEST, rejection.body_text()),
    };
    let request: ReadRequest = match serde_json::from_value(input) {
        Ok(request) => request,
        Err(e) => {
            return error_response(StatusCode::BAD_REQUEST, format!("invalid read request: {e}"))
        }
    };

    match source.fetch_page(&request).await {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(e) => {
            let status =
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            error_response(status, e.to_string())
        }
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
