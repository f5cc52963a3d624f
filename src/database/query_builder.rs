use serde::Serialize;
use serde_json::Value;

use crate::database::reading::Reading;
use crate::database::store::StoreError;

/// Alias every document is addressed by in rendered queries
const ROOT_ALIAS: &str = "c";

/// A named query parameter as the document store expects it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryParameter {
    pub name: String,
    pub value: Value,
}

/// Rendered query text plus its bound parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuerySpec {
    pub query: String,
    pub parameters: Vec<QueryParameter>,
}

/// Query over the readings collection: optional location filter and
/// optional field projection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadingQuery {
    location: Option<String>,
    fields: Option<Vec<String>>,
}

impl ReadingQuery {
    /// Every document in the collection
    pub fn all() -> Self {
        Self::default()
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn project(mut self, fields: &[&str]) -> Self {
        self.fields = Some(fields.iter().map(|f| f.to_string()).collect());
        self
    }

    pub fn location_filter(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Render to the store's SQL dialect. The location is always bound as
    /// `@location`, never spliced into the text.
    pub fn to_spec(&self) -> Result<QuerySpec, StoreError> {
        let select = match &self.fields {
            None => "*".to_string(),
            Some(fields) if fields.is_empty() => {
                return Err(StoreError::InvalidQuery("empty projection".to_string()));
            }
            Some(fields) => {
                for field in fields {
                    if !Self::is_valid_field(field) {
                        return Err(StoreError::InvalidQuery(format!(
                            "invalid projection field '{}'",
                            field
                        )));
                    }
                }
                fields
                    .iter()
                    .map(|f| format!("{}.{}", ROOT_ALIAS, f))
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        };

        let mut query = format!("SELECT {} FROM {}", select, ROOT_ALIAS);
        let mut parameters = Vec::new();

        if let Some(location) = &self.location {
            query.push_str(&format!(" WHERE {}.location = @location", ROOT_ALIAS));
            parameters.push(QueryParameter {
                name: "@location".to_string(),
                value: Value::String(location.clone()),
            });
        }

        Ok(QuerySpec { query, parameters })
    }

    /// Evaluate against an in-memory reading, for stores that hold documents locally.
    /// Returns the projected reading when it matches.
    pub fn apply(&self, reading: &Reading) -> Option<Reading> {
        if let Some(location) = &self.location {
            if reading.location.as_deref() != Some(location.as_str()) {
                return None;
            }
        }

        Some(match &self.fields {
            Some(fields) => reading.project(fields),
            None => reading.clone(),
        })
    }

    fn is_valid_field(name: &str) -> bool {
        !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    }
}
