use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Reverse;

/// Safety status values that carry meaning for the aggregate verdict.
pub const STATUS_SAFE: &str = "Safe";
pub const STATUS_UNSAFE: &str = "Unsafe";

/// One pre-aggregated sensor window for a monitoring location.
///
/// Only the three fields the service reasons about are typed. Everything else
/// the store returns (sensor aggregates, store system fields) rides along in
/// `extra` and is serialized back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(rename = "windowEnd", default, skip_serializing_if = "Option::is_none")]
    pub window_end: Option<String>,

    #[serde(rename = "safetyStatus", default, skip_serializing_if = "Option::is_none")]
    pub safety_status: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Reading {
    pub fn new(location: impl Into<String>, window_end: impl Into<String>) -> Self {
        Self {
            location: Some(location.into()),
            window_end: Some(window_end.into()),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.safety_status = Some(status.into());
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.extra.insert(name.into(), value);
        self
    }

    /// Parsed `windowEnd`, or `None` when absent or not a recognizable timestamp.
    pub fn window_end_at(&self) -> Option<DateTime<Utc>> {
        self.window_end.as_deref().and_then(parse_timestamp)
    }

    pub fn is_safe(&self) -> bool {
        self.safety_status.as_deref() == Some(STATUS_SAFE)
    }

    pub fn is_unsafe(&self) -> bool {
        self.safety_status.as_deref() == Some(STATUS_UNSAFE)
    }

    /// Copy of this reading keeping only the named top-level fields.
    pub fn project(&self, fields: &[String]) -> Reading {
        let keep = |name: &str| fields.iter().any(|f| f == name);

        Reading {
            location: self.location.clone().filter(|_| keep("location")),
            window_end: self.window_end.clone().filter(|_| keep("windowEnd")),
            safety_status: self.safety_status.clone().filter(|_| keep("safetyStatus")),
            extra: self
                .extra
                .iter()
                .filter(|(k, _)| keep(k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }
}

/// Parse an ISO-8601 timestamp. Zone-less values are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Stable sort, newest `windowEnd` first. Equal timestamps keep store order;
/// readings without a usable `windowEnd` sort last.
pub fn sort_newest_first(readings: &mut [Reading]) {
    // Reverse(None) orders after every Reverse(Some(_))
    readings.sort_by_cached_key(|r| Reverse(r.window_end_at()));
}

/// The most recent reading, or `None` for an empty set.
pub fn newest(mut readings: Vec<Reading>) -> Option<Reading> {
    sort_newest_first(&mut readings);
    readings.into_iter().next()
}
