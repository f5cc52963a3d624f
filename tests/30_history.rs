mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn returns_location_history_oldest_first() {
    let app = common::app_with_readings(common::sample_readings());

    let (status, body) = common::get_json(app, "/api/history/NAC").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["location"], "NAC");
    assert_eq!(
        common::window_ends(&body, "data"),
        vec!["2025-01-15T12:00:00Z", "2025-01-15T12:05:00Z", "2025-01-15T12:10:00Z"]
    );
    assert!(body["data"].as_array().unwrap().iter().all(|r| r["location"] == "NAC"));
}

#[tokio::test]
async fn unknown_location_is_an_empty_history() {
    let app = common::app_with_readings(common::sample_readings());

    let (status, body) = common::get_json(app, "/api/history/Hogs_Back").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "location": "Hogs_Back", "data": [] }));
}

#[tokio::test]
async fn accepts_locations_outside_the_monitored_set() {
    let app = common::app_with_readings(vec![
        common::reading("Rideau Falls", "2025-01-15T12:10:00Z", "Unsafe"),
        common::reading("Rideau Falls", "2025-01-15T12:00:00Z", "Safe"),
    ]);

    let (status, body) = common::get_json(app, "/api/history/Rideau%20Falls").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["location"], "Rideau Falls");
    assert_eq!(
        common::window_ends(&body, "data"),
        vec!["2025-01-15T12:00:00Z", "2025-01-15T12:10:00Z"]
    );
}

#[tokio::test]
async fn store_failure_is_a_500() {
    let app = common::app_with_store(common::FailingStore::always());

    let (status, body) = common::get_json(app, "/api/history/NAC").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "success": false, "error": "Failed to fetch history" }));
}

#[tokio::test]
async fn tied_windows_come_back_in_reverse_store_order() {
    let app = common::app_with_readings(vec![
        common::reading("NAC", "2025-01-15T12:00:00Z", "Safe").with_field("id", json!("a")),
        common::reading("NAC", "2025-01-15T12:00:00Z", "Safe").with_field("id", json!("b")),
    ]);

    let (status, body) = common::get_json(app, "/api/history/NAC").await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<_> = body["data"].as_array().unwrap().iter().map(|r| r["id"].clone()).collect();
    assert_eq!(ids, vec![json!("b"), json!("a")]);
}

#[tokio::test]
async fn trailing_slash_reaches_the_same_route() {
    let app = common::app_with_readings(common::sample_readings());

    let (status, body) = common::get_json(app, "/api/history/NAC/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["location"], "NAC");
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
}
