//! CLI command implementations

pub mod health;
pub mod history;
pub mod run;
pub mod scrape;
pub mod settings;
pub mod show;

pub use health::health_command;
pub use history::{dashboard_command, history_command, HistoryArgs};
pub use scrape::{agent_command, maps_command, scrape_command, AgentArgs, MapsArgs, ScrapeArgs};
pub use settings::{settings_command, SettingsAction};
pub use show::{export_command, show_command, ExportArgs, ShowArgs};
