//! Dashboard statistics over recent history

use crate::result::value::{is_truthy, lookup, number_at};
use crate::result::HistoryRecord;

/// Records requested for the dashboard
pub const DASHBOARD_HISTORY_LIMIT: u32 = 100;

/// Recent runs shown on the dashboard
pub const RECENT_RUNS: usize = 5;

const UNKNOWN_URL: &str = "URL desconhecida";
const DEFAULT_SOURCE: &str = "manual";

/// One entry of the recent-runs list
#[derive(Debug, Clone, PartialEq)]
pub struct RecentRun {
    pub url: String,
    pub timestamp: Option<String>,
    pub source: String,
    pub success: bool,
}

/// Aggregates shown on the dashboard
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardStats {
    pub total: usize,
    /// Percentage of successful runs, 0 when there are none
    pub success_rate: f64,
    /// Mean over runs that report a numeric duration
    pub avg_duration: f64,
    pub recent: Vec<RecentRun>,
}

impl DashboardStats {
    pub fn from_records(records: &[HistoryRecord]) -> Self {
        let total = records.len();

        let success_count = records
            .iter()
            .filter(|r| {
                lookup(r.as_value(), &["payload", "success"])
                    .map(is_truthy)
                    .unwrap_or(false)
            })
            .count();
        let success_rate = if total > 0 {
            success_count as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        let durations: Vec<f64> = records
            .iter()
            .filter_map(|r| number_at(r.as_value(), &["payload", "metadata", "duration_seconds"]))
            .collect();
        let avg_duration = if durations.is_empty() {
            0.0
        } else {
            durations.iter().sum::<f64>() / durations.len() as f64
        };

        let recent = records
            .iter()
            .take(RECENT_RUNS)
            .map(RecentRun::from_record)
            .collect();

        Self {
            total,
            success_rate,
            avg_duration,
            recent,
        }
    }

    pub fn success_rate_label(&self) -> String {
        format!("{:.1}%", self.success_rate)
    }

    pub fn avg_duration_label(&self) -> String {
        format!("{:.1}s", self.avg_duration)
    }
}

impl RecentRun {
    fn from_record(record: &HistoryRecord) -> Self {
        let payload = record.payload();
        let url = payload
            .metadata_url()
            .map(str::to_string)
            .or_else(|| record.url())
            .unwrap_or_else(|| UNKNOWN_URL.to_string());
        let source = Some(payload.source())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SOURCE.to_string());

        Self {
            url,
            timestamp: record.timestamp(),
            source,
            success: payload.is_success(),
        }
    }
}
