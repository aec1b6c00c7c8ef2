//! Terminal output
//!
//! Formatting of view models, notifications, the run log and the stage
//! spinner shown while a request is pending.

pub mod formatters;
pub mod notify;
pub mod progress;
pub mod text_utils;

pub use formatters::{DashboardFormatter, HistoryFormatter, ResultFormatter};
pub use progress::{RunLog, SharedRunLog, StageTicker};
