// handlers/api/all.rs - GET /api/all handler (debug listing, unpaginated)

use axum::extract::State;
use serde::Serialize;
use std::sync::Arc;

use crate::app::AppState;
use crate::database::Reading;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Serialize)]
pub struct AllBody {
    pub count: usize,
    pub data: Vec<Reading>,
}

pub async fn all_get(State(state): State<Arc<AppState>>) -> ApiResult<AllBody> {
    let data = state
        .readings
        .all()
        .await
        .map_err(|e| ApiError::store_failure("/api/all", "Failed to fetch all data", e))?;

    Ok(ApiResponse::success(AllBody { count: data.len(), data }))
}
