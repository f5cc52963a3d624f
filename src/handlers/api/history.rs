// handlers/api/history.rs - GET /api/history/:location handler

use axum::extract::{Path, State};
use serde::Serialize;
use std::sync::Arc;

use crate::app::AppState;
use crate::database::Reading;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Serialize)]
pub struct HistoryBody {
    pub location: String,
    pub data: Vec<Reading>,
}

/// All readings for one location, oldest first. Any location string is
/// accepted; unknown ones simply have no history.
pub async fn history_get(
    Path(location): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<HistoryBody> {
    let data = state
        .readings
        .history(&location)
        .await
        .map_err(|e| ApiError::store_failure("/api/history", "Failed to fetch history", e))?;

    Ok(ApiResponse::success(HistoryBody { location, data }))
}
