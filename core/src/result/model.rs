//! The Scrape Result document as returned by the backend

use super::value::{display, is_truthy, lookup, number_at, present, str_at};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Source tag marking results produced by the Google Maps library extractor
pub const MAPS_SOURCE_TAG: &str = "library:google_maps";

/// Fallback shown when a failed result carries no message
pub const UNKNOWN_ERROR: &str = "Erro desconhecido";

/// Prefix of the synthesized message for transport failures
pub const CONNECTION_FAILURE_PREFIX: &str = "Falha de conexão com API";

/// Full payload of a scrape or agent run, success or failure.
///
/// The backend never guarantees any field, so the document is kept as a raw
/// JSON value and read through accessors that fall back instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScrapeResult(Value);

impl ScrapeResult {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Failure result standing in for a request that never produced a
    /// document (unreachable backend, non-JSON body).
    pub fn transport_failure(error: impl std::fmt::Display) -> Self {
        Self(json!({
            "success": false,
            "error": format!("{}: {}", CONNECTION_FAILURE_PREFIX, error),
        }))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Only a literal `true` counts as success.
    pub fn is_success(&self) -> bool {
        self.0.get("success").and_then(Value::as_bool) == Some(true)
    }

    pub fn error_message(&self) -> String {
        present(self.0.get("error"))
            .map(display)
            .unwrap_or_else(|| UNKNOWN_ERROR.to_string())
    }

    pub fn error_type(&self) -> String {
        present(lookup(&self.0, &["metadata", "error_type"]))
            .map(display)
            .unwrap_or_else(|| "unknown".to_string())
    }

    pub fn duration_seconds(&self) -> Option<f64> {
        number_at(&self.0, &["metadata", "duration_seconds"])
    }

    pub fn cost_usd(&self) -> Option<f64> {
        number_at(&self.0, &["metadata", "cost_usd"])
    }

    pub fn quality_score(&self) -> Option<f64> {
        number_at(&self.0, &["metadata", "quality", "quality_score"])
    }

    pub fn tokens_total(&self) -> Option<&Value> {
        lookup(&self.0, &["metadata", "tokens_used", "total"]).filter(|v| is_truthy(v))
    }

    /// Provenance tag, empty when absent
    pub fn source(&self) -> String {
        present(lookup(&self.0, &["metadata", "source"]))
            .map(display)
            .unwrap_or_default()
    }

    /// Whether the lead-card template applies
    pub fn is_map_source(&self) -> bool {
        self.source().contains(MAPS_SOURCE_TAG)
    }

    /// Target URL recorded in the metadata
    pub fn metadata_url(&self) -> Option<&str> {
        str_at(&self.0, &["metadata", "url"]).filter(|s| !s.is_empty())
    }

    /// Non-empty AI summary (Markdown)
    pub fn summary(&self) -> Option<&str> {
        str_at(&self.0, &["data", "summary"]).filter(|s| !s.is_empty())
    }

    /// `data.findings` when it is an array, else `data.items`, else nothing.
    pub fn findings(&self) -> &[Value] {
        lookup(&self.0, &["data", "findings"])
            .and_then(Value::as_array)
            .or_else(|| lookup(&self.0, &["data", "items"]).and_then(Value::as_array))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Agent steps, present only for agent runs
    pub fn steps(&self) -> &[Value] {
        self.0
            .get("steps")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Backend-assigned identity, `None` when neither `id` nor `record_id`
    /// holds a truthy value.
    pub fn record_id(&self) -> Option<String> {
        ["id", "record_id"]
            .iter()
            .filter_map(|key| self.0.get(*key))
            .find(|v| is_truthy(v))
            .map(display)
    }

    /// Identity used in export file names
    pub fn identity(&self) -> String {
        self.record_id().unwrap_or_else(|| "data".to_string())
    }
}

impl From<Value> for ScrapeResult {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl Default for ScrapeResult {
    fn default() -> Self {
        Self(Value::Null)
    }
}
