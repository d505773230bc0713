//! Full reads against the in-memory data service.

use grid_source::{
    DatasetId, FetchPolicy, FilterCondition, GridDataSource, ReadOutcome, ReadRequest,
};
use serde_json::json;

use crate::support::prices;

#[tokio::test]
async fn price_filter_sorted_descending() {
    let source = GridDataSource::new(prices(), DatasetId::new("dataset_prices"));
    let request: ReadRequest = serde_json::from_value(json!({
        "skip": 0,
        "take": 2,
        "sort": [{ "field": "price", "dir": "desc" }],
        "filter": { "logic": "and", "filters": [{ "field": "price", "operator": "gte", "value": 80 }] }
    }))
    .unwrap();

    let page = source.fetch_page(&request).await.unwrap();

    let requests = source.executor().client().requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].fetch_policy, FetchPolicy::NetworkOnly);
    assert_eq!(
        requests[0].variables,
        json!({
            "start": 0,
            "size": 2,
            "sorts": [{ "fieldId": "price", "ascending": false }],
            "filters": [{ "type": "RANGE", "fieldId": "price", "min": "80" }]
        })
    );
    assert!(requests[0]
        .document
        .text()
        .contains(r#"dataSetId: "dataset_prices""#));

    assert_eq!(page.total, 3);
    assert_eq!(
        serde_json::to_value(&page).unwrap(),
        json!({
            "data": [
                { "ticker": "CCC", "price": 132.25, "sector": "tech", "_rowIndex": 0 },
                { "ticker": "DDD", "price": 91, "sector": null, "_rowIndex": 1 }
            ],
            "total": 3
        })
    );
}

#[tokio::test]
async fn second_page_restarts_row_index() {
    let source = GridDataSource::new(prices(), DatasetId::new("dataset_prices"));
    let page = source
        .fetch_page(&ReadRequest::new(2, 2).sort_by("ticker", "asc"))
        .await
        .unwrap();

    let tickers: Vec<_> = page.data.iter().map(|r| r.get("ticker").cloned().unwrap()).collect();
    assert_eq!(tickers, vec![json!("CCC"), json!("DDD")]);
    assert_eq!(page.data[0].row_index(), Some(0));
    assert_eq!(page.data[1].row_index(), Some(1));
    assert_eq!(page.total, 5);
}

#[tokio::test]
async fn equality_and_empty_filters_combine() {
    let source = GridDataSource::new(prices(), DatasetId::new("dataset_prices"));
    let request = ReadRequest::new(0, 10)
        .filter_by(FilterCondition::unary("sector", "isnotempty"))
        .filter_by(FilterCondition::new("sector", "neq", "tech"));

    let outcome = source.read_page(&request).await.unwrap();
    let page = match outcome {
        ReadOutcome::Page(page) => page,
        other => panic!("expected a page, got {other:?}"),
    };
    let tickers: Vec<_> = page.data.iter().map(|r| r.get("ticker").cloned().unwrap()).collect();
    assert_eq!(tickers, vec![json!("AAA"), json!("EEE")]);
}

#[tokio::test]
async fn contains_filter_with_numeric_value_is_stringified() {
    let source = GridDataSource::new(prices(), DatasetId::new("dataset_prices"));
    let page = source
        .fetch_page(&ReadRequest::new(0, 10).filter_by(FilterCondition::new("price", "contains", 79)))
        .await
        .unwrap();

    assert_eq!(
        source.executor().client().requests()[0].variables["filters"],
        json!([{ "type": "SUBSTRING", "fieldId": "price", "value": "79" }])
    );
    assert_eq!(page.total, 1);
    assert_eq!(page.data[0].get("ticker"), Some(&json!("EEE")));
}

#[tokio::test]
async fn configured_source_uses_query_name_and_options() {
    let config = grid_source::AdapterConfig::from_yaml(
        r#"
endpoint: "http://localhost:8080/api/graphql"
dataset_id: "dataset_prices"
query_name: "prices"
page_size: 25
fields:
  price: number
"#,
    )
    .unwrap();

    let source = GridDataSource::from_config(prices(), &config);
    assert_eq!(source.options().page_size, 25);
    assert_eq!(source.executor().document().root_field(), "prices");

    let page = source.fetch_page(&ReadRequest::new(0, 1)).await.unwrap();
    assert_eq!(page.data.len(), 1);
}
