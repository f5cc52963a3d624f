use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::database::reading::{newest, sort_newest_first, Reading};
use crate::database::{ReadingQuery, ReadingStore, StoreError};

/// Monitoring sites served by the latest and status endpoints, in response order.
pub const MONITORED_LOCATIONS: [&str; 3] = ["Dows_Lake", "Fifth_Avenue", "NAC"];

/// Fields the status endpoint needs from each location's newest reading
pub const STATUS_FIELDS: [&str; 3] = ["location", "safetyStatus", "windowEnd"];

/// Canal-wide verdict derived from each location's newest reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OverallStatus {
    Safe,
    Unsafe,
    Caution,
}

impl OverallStatus {
    /// Safe when every reading is Safe, Unsafe when any reading is Unsafe,
    /// Caution otherwise. An empty set is vacuously Safe.
    pub fn aggregate(readings: &[Reading]) -> Self {
        if readings.iter().all(Reading::is_safe) {
            OverallStatus::Safe
        } else if readings.iter().any(Reading::is_unsafe) {
            OverallStatus::Unsafe
        } else {
            OverallStatus::Caution
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub overall_status: OverallStatus,
    pub locations: Vec<Reading>,
}

/// Read-side operations over the readings store
pub struct ReadingService {
    store: Arc<dyn ReadingStore>,
    locations: Vec<String>,
}

impl ReadingService {
    pub fn new(store: Arc<dyn ReadingStore>) -> Self {
        Self {
            store,
            locations: MONITORED_LOCATIONS.iter().map(|l| l.to_string()).collect(),
        }
    }

    pub fn store_name(&self) -> &'static str {
        self.store.name()
    }

    /// Newest full reading for each monitored location that has data
    pub async fn latest(&self) -> Result<Vec<Reading>, StoreError> {
        self.newest_per_location(None).await
    }

    /// Every reading for `location`, oldest first
    pub async fn history(&self, location: &str) -> Result<Vec<Reading>, StoreError> {
        let mut readings = self.store.query(&ReadingQuery::all().location(location)).await?;
        sort_newest_first(&mut readings);
        readings.reverse();
        Ok(readings)
    }

    /// Newest status projection per location plus the aggregate verdict
    pub async fn status(&self) -> Result<StatusReport, StoreError> {
        let locations = self.newest_per_location(Some(&STATUS_FIELDS[..])).await?;
        let overall_status = OverallStatus::aggregate(&locations);
        debug!(?overall_status, reporting = locations.len(), "Aggregated canal status");

        Ok(StatusReport { overall_status, locations })
    }

    /// Every reading in the store, newest first
    pub async fn all(&self) -> Result<Vec<Reading>, StoreError> {
        let mut readings = self.store.query(&ReadingQuery::all()).await?;
        sort_newest_first(&mut readings);
        Ok(readings)
    }

    // Locations are queried one after another; the first failure aborts the lot.
    async fn newest_per_location(&self, fields: Option<&[&str]>) -> Result<Vec<Reading>, StoreError> {
        let mut results = Vec::with_capacity(self.locations.len());

        for location in &self.locations {
            let mut query = ReadingQuery::all().location(location.as_str());
            if let Some(fields) = fields {
                query = query.project(fields);
            }

            let readings = self.store.query(&query).await?;
            debug!(location = %location, count = readings.len(), "Queried location");

            if let Some(reading) = newest(readings) {
                results.push(reading);
            }
        }

        Ok(results)
    }
}
