// handlers/health.rs - GET /health handler

use axum::{extract::State, response::Json};
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::app::AppState;

/// Point-in-time liveness report. Never touches the store; only says
/// whether its settings are present.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    let cosmos = &state.config.cosmos;

    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "cosmosdb": {
            "endpoint": presence(&cosmos.endpoint),
            "database": presence(&cosmos.database),
            "container": presence(&cosmos.container),
        }
    }))
}

fn presence(value: &Option<String>) -> &'static str {
    if value.is_some() {
        "configured"
    } else {
        "missing"
    }
}
