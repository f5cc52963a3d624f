pub mod reading_service;

pub use reading_service::{OverallStatus, ReadingService, StatusReport, MONITORED_LOCATIONS};
