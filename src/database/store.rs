use async_trait::async_trait;
use thiserror::Error;

use crate::database::query_builder::ReadingQuery;
use crate::database::reading::Reading;

/// Errors from a reading store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid store endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Store key is not valid base64")]
    InvalidKey,

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Store returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode store response: {0}")]
    Decode(String),

    #[error("Fixture error: {0}")]
    Fixture(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Read-only access to the collection of sensor-window readings.
///
/// Implementations return every document matching the query; paging is
/// their own concern.
#[async_trait]
pub trait ReadingStore: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    async fn query(&self, query: &ReadingQuery) -> Result<Vec<Reading>, StoreError>;
}
