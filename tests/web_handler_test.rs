#![cfg(feature = "web")]
//! Tool server handler tests.
//!
//! Tests cover:
//! - Tool listing
//! - Each computation endpoint with inline records
//! - basic-data through the data port
//! - JSON error bodies and status codes

mod common;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use stockscope::adapters::web::{AppState, build_router};
use stockscope::domain::params::IndicatorParams;
use tower::ServiceExt;

use common::*;

fn create_test_app() -> Router {
    let port = MockDataPort::new()
        .with_records("RELIANCE", v_then_peak("RELIANCE", "2025-01-01", 30, 30))
        .with_records("TCS", generate_records("TCS", "2025-01-01", 40, 3500.0))
        .with_error("BROKEN", "socket closed");

    build_router(AppState {
        data_port: Arc::new(port),
        params: IndicatorParams {
            sma_short: 5,
            sma_long: 10,
            ..IndicatorParams::default()
        },
    })
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post(app: Router, uri: &str, payload: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

fn records_json(closes: &[f64]) -> Value {
    serde_json::to_value(records_from_closes("RELIANCE", "2025-01-01", closes)).unwrap()
}

#[tokio::test]
async fn lists_every_tool() {
    let (status, body) = get(create_test_app(), "/tools").await;
    assert_eq!(status, StatusCode::OK);

    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "basic-data",
            "sma-signals",
            "rsi-signals",
            "atr",
            "mfi",
            "summary-stats",
            "evaluate"
        ]
    );
}

#[tokio::test]
async fn sma_signals_use_state_params_by_default() {
    let closes: Vec<f64> = (0..12).map(|i| 100.0 + i as f64).collect();
    let (status, body) = post(
        create_test_app(),
        "/tools/sma-signals",
        json!({ "records": records_json(&closes) }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 12);
    assert!(rows[8]["long_sma"].is_null());
    assert_eq!(rows[9]["signal"], 1);
}

#[tokio::test]
async fn rsi_signals_with_request_params() {
    let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
    let (status, body) = post(
        create_test_app(),
        "/tools/rsi-signals",
        json!({ "records": records_json(&closes), "params": { "rsi_period": 14 } }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 6);
    assert!(rows.iter().all(|r| r["rsi"] == 100.0 && r["signal"] == -1));
}

#[tokio::test]
async fn atr_mfi_and_stats_are_keyed_by_symbol() {
    let closes: Vec<f64> = (0..20).map(|i| 100.0 + (i % 3) as f64).collect();
    for uri in ["/tools/atr", "/tools/mfi", "/tools/summary-stats"] {
        let (status, body) = post(
            create_test_app(),
            uri,
            json!({ "records": records_json(&closes) }),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert!(body.get("RELIANCE").is_some(), "{uri}");
    }
}

#[tokio::test]
async fn evaluate_pairs_buy_and_sell() {
    let records = records_json(&[100.0, 105.0, 110.0]);
    let signals = json!([
        { "symbol": "RELIANCE", "date": "2025-01-01", "rsi": 25.0, "signal": 1 },
        { "symbol": "RELIANCE", "date": "2025-01-03", "rsi": 75.0, "signal": -1 }
    ]);
    let (status, body) = post(
        create_test_app(),
        "/tools/evaluate",
        json!({ "records": records, "signals": signals }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["trades"].as_array().unwrap().len(), 1);
    assert_eq!(body["total_pnl"], 10.0);
    assert_eq!(body["win_rate"], 1.0);
}

#[tokio::test]
async fn basic_data_loads_through_data_port() {
    let (status, body) = post(
        create_test_app(),
        "/tools/basic-data",
        json!({ "symbols": "reliance.ns, TCS, BROKEN", "start_date": "2025-01-01", "end_date": "2025-12-31" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let stats = body["summary_statistics"].as_object().unwrap();
    assert_eq!(stats.keys().collect::<Vec<_>>(), vec!["RELIANCE", "TCS"]);
    assert_eq!(body["atr"]["TCS"].as_array().unwrap().len(), 40 - 14);
}

#[tokio::test]
async fn basic_data_with_no_loadable_symbol_is_unprocessable() {
    let (status, body) = post(
        create_test_app(),
        "/tools/basic-data",
        json!({ "symbols": "BROKEN", "start_date": "2025-01-01", "end_date": "2025-12-31" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("BROKEN"));
}

#[tokio::test]
async fn basic_data_rejects_inverted_range() {
    let (status, body) = post(
        create_test_app(),
        "/tools/basic-data",
        json!({ "symbols": "TCS", "start_date": "2025-02-01", "end_date": "2025-01-01" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn duplicate_records_are_bad_request() {
    let mut records = records_from_closes("TCS", "2025-01-01", &[100.0, 101.0]);
    records[1].date = records[0].date;
    let (status, body) = post(
        create_test_app(),
        "/tools/summary-stats",
        json!({ "records": records }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("duplicate"));
}

#[tokio::test]
async fn invalid_params_are_bad_request() {
    let (status, _) = post(
        create_test_app(),
        "/tools/rsi-signals",
        json!({ "records": records_json(&[1.0, 2.0]), "params": { "rsi_period": 0 } }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_body_is_json_error() {
    let (status, body) = post(
        create_test_app(),
        "/tools/atr",
        json!({ "records": "not a list" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn unknown_route_is_json_not_found() {
    let (status, body) = get(create_test_app(), "/tools/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "no such tool");
}
