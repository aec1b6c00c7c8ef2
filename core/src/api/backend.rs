//! Backend trait and response structures

use super::request::{AgentRequest, HistoryQuery, ScrapeRequest};
use crate::error::Result;
use crate::result::{HistoryRecord, ScrapeResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Up/down indicator of the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiHealth {
    Ok,
    Down,
}

impl ApiHealth {
    pub fn is_ok(&self) -> bool {
        matches!(self, ApiHealth::Ok)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ApiHealth::Ok => "conectada",
            ApiHealth::Down => "inacessível",
        }
    }
}

/// Body of `GET /api/history`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryPage {
    /// Records in the order the backend returned them
    #[serde(default)]
    pub items: Vec<HistoryRecord>,
}

impl HistoryPage {
    /// Read a page leniently: a missing or non-array `items` is empty.
    pub fn from_value(value: &serde_json::Value) -> Self {
        let items = value
            .get("items")
            .and_then(serde_json::Value::as_array)
            .map(|items| items.iter().cloned().map(HistoryRecord::new).collect())
            .unwrap_or_default();
        Self { items }
    }
}

/// Trait for scraping backends
#[async_trait]
pub trait ScrapeBackend: Send + Sync {
    /// Probe `GET /health`. Transport failures read as `Down`.
    async fn health(&self) -> ApiHealth;

    /// Fetch stored runs, most recent first as ordered by the backend
    async fn history(&self, query: &HistoryQuery) -> Result<Vec<HistoryRecord>>;

    /// Run a single-page scrape
    async fn scrape(&self, request: &ScrapeRequest) -> Result<ScrapeResult>;

    /// Run the step-by-step browsing agent
    async fn scrape_agent(&self, request: &AgentRequest) -> Result<ScrapeResult>;

    /// Human-readable name of the backend, used in logs
    fn name(&self) -> &str;
}
