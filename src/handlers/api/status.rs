// handlers/api/status.rs - GET /api/status handler

use axum::extract::State;
use std::sync::Arc;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::StatusReport;

pub async fn status_get(State(state): State<Arc<AppState>>) -> ApiResult<StatusReport> {
    let report = state
        .readings
        .status()
        .await
        .map_err(|e| ApiError::store_failure("/api/status", "Failed to fetch status", e))?;

    Ok(ApiResponse::success(report))
}
