use async_trait::async_trait;
use std::path::Path;

use crate::database::query_builder::ReadingQuery;
use crate::database::reading::Reading;
use crate::database::store::{ReadingStore, StoreError};

/// In-process store over a fixed set of readings. Backs local runs from a
/// JSON fixture and the router tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    readings: Vec<Reading>,
}

impl MemoryStore {
    pub fn new(readings: Vec<Reading>) -> Self {
        Self { readings }
    }

    /// Load a JSON array of reading documents
    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| StoreError::Fixture(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&raw)
            .map_err(|e| StoreError::Fixture(format!("{}: {}", path.display(), e)))
    }

    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        let readings: Vec<Reading> = serde_json::from_str(raw)?;
        Ok(Self::new(readings))
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

#[async_trait]
impl ReadingStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn query(&self, query: &ReadingQuery) -> Result<Vec<Reading>, StoreError> {
        // Same validation the remote store would apply
        query.to_spec()?;
        Ok(self.readings.iter().filter_map(|r| query.apply(r)).collect())
    }
}
