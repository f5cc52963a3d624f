// handlers/api/latest.rs - GET /api/latest handler

use axum::extract::State;
use serde::Serialize;
use std::sync::Arc;

use crate::app::AppState;
use crate::database::Reading;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Serialize)]
pub struct LatestBody {
    pub data: Vec<Reading>,
}

/// Newest reading for each monitored location, in fixed location order.
pub async fn latest_get(State(state): State<Arc<AppState>>) -> ApiResult<LatestBody> {
    let data = state
        .readings
        .latest()
        .await
        .map_err(|e| ApiError::store_failure("/api/latest", "Failed to fetch latest", e))?;

    Ok(ApiResponse::success(LatestBody { data }))
}
