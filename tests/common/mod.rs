#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use rideau_canal_api::config::AppConfig;
use rideau_canal_api::database::{MemoryStore, Reading, ReadingQuery, ReadingStore, StoreError};
use rideau_canal_api::{app, App, AppState};

/// Store that fails every query, or only queries for one location
pub struct FailingStore {
    inner: MemoryStore,
    fail_for: Option<String>,
}

impl FailingStore {
    pub fn always() -> Self {
        Self { inner: MemoryStore::default(), fail_for: None }
    }

    pub fn for_location(readings: Vec<Reading>, location: &str) -> Self {
        Self { inner: MemoryStore::new(readings), fail_for: Some(location.to_string()) }
    }
}

#[async_trait]
impl ReadingStore for FailingStore {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn query(&self, query: &ReadingQuery) -> Result<Vec<Reading>, StoreError> {
        let fails = match &self.fail_for {
            None => true,
            Some(location) => query.location_filter() == Some(location.as_str()),
        };
        if fails {
            return Err(StoreError::Status { status: 503, body: "connection refused".into() });
        }
        self.inner.query(query).await
    }
}

/// Configuration with no environment at all
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::from_lookup(|_| None);
    config.logging.enable_request_logging = false;
    config
}

pub fn app_with_store(store: impl ReadingStore + 'static) -> App {
    app_with(test_config(), store)
}

pub fn app_with(config: AppConfig, store: impl ReadingStore + 'static) -> App {
    app(Arc::new(AppState::new(config, Arc::new(store))))
}

pub fn app_with_readings(readings: Vec<Reading>) -> App {
    app_with_store(MemoryStore::new(readings))
}

pub fn reading(location: &str, window_end: &str, status: &str) -> Reading {
    Reading::new(location, window_end).with_status(status)
}

/// A small canal day: three sites, several windows each, out of order
pub fn sample_readings() -> Vec<Reading> {
    vec![
        reading("NAC", "2025-01-15T12:05:00Z", "Safe").with_field("avgIceThickness", json!(31.2)),
        reading("Dows_Lake", "2025-01-15T12:00:00Z", "Safe").with_field("avgIceThickness", json!(33.0)),
        reading("Fifth_Avenue", "2025-01-15T12:10:00Z", "Caution").with_field("avgIceThickness", json!(27.5)),
        reading("NAC", "2025-01-15T12:10:00Z", "Safe").with_field("avgIceThickness", json!(31.0)),
        reading("Dows_Lake", "2025-01-15T12:10:00Z", "Safe").with_field("avgIceThickness", json!(32.8)),
        reading("Fifth_Avenue", "2025-01-15T12:00:00Z", "Safe").with_field("avgIceThickness", json!(28.1)),
        reading("NAC", "2025-01-15T12:00:00Z", "Safe").with_field("avgIceThickness", json!(31.4)),
    ]
}

pub async fn get_json(app: App, uri: &str) -> (StatusCode, Value) {
    let (status, bytes) = get_bytes(app, uri).await;
    let json: Value = serde_json::from_slice(&bytes).expect("valid JSON response");
    (status, json)
}

pub async fn get_bytes(app: App, uri: &str) -> (StatusCode, Vec<u8>) {
    let resp = app
        .oneshot(Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = resp.status();
    let bytes = resp.into_body().collect().await.expect("collect body").to_bytes();
    (status, bytes.to_vec())
}

/// `windowEnd` of every entry in a response's array field
pub fn window_ends(body: &Value, field: &str) -> Vec<String> {
    body[field]
        .as_array()
        .expect("array field")
        .iter()
        .map(|r| r["windowEnd"].as_str().unwrap_or_default().to_string())
        .collect()
}
