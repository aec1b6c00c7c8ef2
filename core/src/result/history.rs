//! History records: server-persisted wrappers around earlier results

use super::model::ScrapeResult;
use super::value::{display, is_truthy, present};
use super::view::format_duration;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Characters of the record id shown in list rows
const SHORT_ID_LEN: usize = 8;

/// Day-first display of stored timestamps
const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Format an ISO-8601 timestamp for display. Offsets are kept as stored;
/// anything unparsable is returned unchanged.
pub fn format_timestamp(raw: &str) -> String {
    if let Ok(parsed) = chrono::DateTime::parse_from_rfc3339(raw) {
        return parsed.format(TIMESTAMP_FORMAT).to_string();
    }
    match chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(parsed) => parsed.format(TIMESTAMP_FORMAT).to_string(),
        Err(_) => raw.to_string(),
    }
}

/// `{ id, url?, timestamp?, payload }` as stored by the backend.
///
/// Kept as raw JSON like the payload it wraps; nothing is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryRecord(Value);

impl HistoryRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// The wrapped result. A missing or non-object payload reads as an
    /// empty document, i.e. a failure.
    pub fn payload(&self) -> ScrapeResult {
        let payload = self
            .0
            .get("payload")
            .filter(|p| p.is_object())
            .cloned()
            .unwrap_or_else(|| Value::Object(Default::default()));
        ScrapeResult::new(payload)
    }

    pub fn id(&self) -> Option<String> {
        self.0.get("id").filter(|v| is_truthy(v)).map(display)
    }

    pub fn url(&self) -> Option<String> {
        self.0.get("url").filter(|v| is_truthy(v)).map(display)
    }

    /// Stored timestamp, formatted for display
    pub fn timestamp(&self) -> Option<String> {
        present(self.0.get("timestamp"))
            .map(display)
            .map(|raw| format_timestamp(&raw))
    }
}

/// One history list row
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    /// Record url, else the payload's metadata url, else `-`
    pub target: String,
    /// `Templates` for library runs, `Manual` otherwise
    pub kind: &'static str,
    pub is_library: bool,
    pub success: bool,
    pub duration: String,
    pub short_id: String,
    pub timestamp: Option<String>,
}

impl HistoryRow {
    pub fn build(record: &HistoryRecord) -> Self {
        let payload = record.payload();
        let source = Some(payload.source())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "scraper_manual".to_string());
        let is_library = source.contains("library");

        let record_id = record
            .id()
            .or_else(|| payload.record_id())
            .unwrap_or_else(|| "-".to_string());

        Self {
            target: record
                .url()
                .or_else(|| payload.metadata_url().map(str::to_string))
                .unwrap_or_else(|| "-".to_string()),
            kind: if is_library { "Templates" } else { "Manual" },
            is_library,
            success: payload.is_success(),
            duration: format_duration(payload.duration_seconds()),
            short_id: record_id.chars().take(SHORT_ID_LEN).collect(),
            timestamp: record.timestamp(),
        }
    }
}
