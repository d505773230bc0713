//! GraphQlHttpClient against the fake data service.

use std::time::Duration;

use grid_source::{
    AdapterConfig, AdapterError, ClientError, DatasetId, FetchPolicy, FilterCondition,
    GraphQlHttpClient, GridDataSource, QueryClient, QueryDocument, QueryParameters, QueryRequest,
    ReadRequest,
};
use serde_json::json;

use crate::support::start_fake_service;

fn source(endpoint: String) -> GridDataSource<GraphQlHttpClient> {
    let client = GraphQlHttpClient::new(endpoint, Duration::from_secs(5)).unwrap();
    GridDataSource::new(client, DatasetId::new("dataset_prices"))
}

#[tokio::test]
async fn reads_a_page_over_graphql() {
    let (base, service) = start_fake_service().await;
    let source = source(format!("{base}/graphql"));

    let request = ReadRequest::new(0, 2)
        .sort_by("price", "desc")
        .filter_by(FilterCondition::new("price", "gte", 80));
    let page = source.fetch_page(&request).await.unwrap();

    assert_eq!(page.total, 2);
    assert_eq!(
        serde_json::to_value(&page.data).unwrap(),
        json!([
            { "ticker": "CCC", "price": 132.25, "_rowIndex": 0 },
            { "ticker": "BBB", "price": 80, "_rowIndex": 1 }
        ])
    );

    let seen = service.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].body["operationName"], "DataQuery");
    assert!(seen[0].body["query"]
        .as_str()
        .unwrap()
        .contains(r#"dataSetId: "dataset_prices""#));
    assert_eq!(
        seen[0].body["variables"],
        json!({
            "start": 0,
            "size": 2,
            "sorts": [{ "fieldId": "price", "ascending": false }],
            "filters": [{ "type": "RANGE", "fieldId": "price", "min": "80" }]
        })
    );
    assert_eq!(seen[0].cache_control.as_deref(), Some("no-cache"));
    assert_eq!(seen[0].query_string, None);
}

#[tokio::test]
async fn test_mode_flag_reaches_the_service() {
    let (base, service) = start_fake_service().await;
    let config = AdapterConfig::from_yaml(&format!(
        "endpoint: \"{base}/graphql\"\ndataset_id: \"dataset_prices\"\ntest_mode: true\n"
    ))
    .unwrap();
    let client = GraphQlHttpClient::from_config(&config).unwrap();
    assert_eq!(client.endpoint(), format!("{base}/graphql?testMode=true"));
    let source = GridDataSource::from_config(client, &config);

    source.fetch_page(&ReadRequest::new(0, 1)).await.unwrap();

    assert_eq!(service.seen()[0].query_string.as_deref(), Some("testMode=true"));
}

#[tokio::test]
async fn cache_first_query_sends_no_cache_headers() {
    let (base, service) = start_fake_service().await;
    let client = GraphQlHttpClient::new(format!("{base}/graphql"), Duration::from_secs(5)).unwrap();

    let response = client
        .query(QueryRequest {
            document: QueryDocument::data_query(&DatasetId::new("dataset_prices"), "data"),
            variables: QueryParameters { start: 0, size: 1, ..QueryParameters::default() }
                .to_variables(),
            fetch_policy: FetchPolicy::CacheFirst,
        })
        .await
        .unwrap();

    assert_eq!(response.data["data"]["totalSize"], 3);
    assert_eq!(service.seen()[0].cache_control, None);
}

#[tokio::test]
async fn graphql_errors_become_transport_errors() {
    let (base, _service) = start_fake_service().await;
    let err = source(format!("{base}/errors"))
        .fetch_page(&ReadRequest::new(0, 1))
        .await
        .unwrap_err();

    match err {
        AdapterError::Transport(ClientError::GraphQl(messages)) => {
            assert_eq!(messages, vec!["dataset not found".to_string()])
        }
        other => panic!("expected GraphQL error, got {other:?}"),
    }
}

#[tokio::test]
async fn unknown_sort_field_is_reported_by_the_service() {
    let (base, _service) = start_fake_service().await;
    let err = source(format!("{base}/graphql"))
        .fetch_page(&ReadRequest::new(0, 1).sort_by("volume", "asc"))
        .await
        .unwrap_err();

    assert!(matches!(err, AdapterError::Transport(ClientError::GraphQl(_))));
}

#[tokio::test]
async fn error_status_carries_body() {
    let (base, _service) = start_fake_service().await;
    let err = source(format!("{base}/down"))
        .fetch_page(&ReadRequest::new(0, 1))
        .await
        .unwrap_err();

    match err {
        AdapterError::Transport(ClientError::Status { status, body }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "maintenance");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_body_is_a_decode_error() {
    let (base, _service) = start_fake_service().await;
    let err = source(format!("{base}/garbage"))
        .fetch_page(&ReadRequest::new(0, 1))
        .await
        .unwrap_err();

    assert!(matches!(err, AdapterError::Transport(ClientError::Decode(_))));
}

#[tokio::test]
async fn refused_connection_is_a_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = source(format!("http://{addr}/graphql"))
        .fetch_page(&ReadRequest::new(0, 1))
        .await
        .unwrap_err();

    assert!(matches!(err, AdapterError::Transport(ClientError::Network(_))));
}
