//! Finding normalization
//!
//! A Finding may carry domain fields either at top level or inside its
//! `extra` object. Every consumer (lead cards, CSV export) reads the single
//! flattened view built here, so the precedence rule lives in one place:
//! a top-level key wins over `extra`, even when its value is null.
//!
//! Card title, description and link only ever come from the top level.

use super::value::present;
use serde_json::{Map, Value};

/// One Finding flattened once for display and export
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedFinding {
    /// Top-level keys in original order (minus `extra`), followed by the
    /// `extra` keys that were not already present.
    pub fields: Map<String, Value>,
    /// The raw `extra` entries, in original order
    pub extra: Map<String, Value>,
    /// Top-level keys only (minus `extra`)
    pub top: Map<String, Value>,
}

impl NormalizedFinding {
    /// Normalize a raw Finding. Anything that is not an object yields an
    /// empty finding.
    pub fn normalize(raw: &Value) -> Self {
        let Some(object) = raw.as_object() else {
            return Self::default();
        };

        let extra = object
            .get("extra")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        let top: Map<String, Value> = object
            .iter()
            .filter(|(key, _)| key.as_str() != "extra")
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        let mut fields = top.clone();
        for (key, value) in &extra {
            if !fields.contains_key(key) {
                fields.insert(key.clone(), value.clone());
            }
        }

        Self { fields, extra, top }
    }

    /// Normalize every Finding of a list, preserving order
    pub fn normalize_all(raw: &[Value]) -> Vec<Self> {
        raw.iter().map(Self::normalize).collect()
    }

    /// A field that is present and not null
    pub fn get(&self, key: &str) -> Option<&Value> {
        present(self.fields.get(key))
    }

    /// First present field among aliases
    pub fn get_any(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter().find_map(|key| self.get(key))
    }

    /// A top-level field that is present and not null, ignoring `extra`
    pub fn top_level(&self, key: &str) -> Option<&Value> {
        present(self.top.get(key))
    }

    pub fn title(&self) -> Option<&Value> {
        self.top_level("title")
    }

    pub fn description(&self) -> Option<&Value> {
        self.top_level("description")
    }

    pub fn url(&self) -> Option<&Value> {
        self.top_level("url")
    }
}
