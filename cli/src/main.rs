//! # toolzz CLI
//!
//! Command-line client for the Toolzz scraping and extraction API.
//!
//! ## Usage
//!
//! - `toolzz scrape <url> -p "instruction"` - Scrape a page with an AI instruction
//! - `toolzz agent <url> -g "goal"` - Run the step-by-step browsing agent
//! - `toolzz maps "padarias em São Paulo"` - Extract Google Maps leads
//! - `toolzz history --status error --domain openai.com` - Browse stored runs
//! - `toolzz show result.json` / `toolzz export result.json -f csv` - Inspect and export results
//! - `toolzz settings set` - Store the API key sent with scrape requests

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod output;

use commands::{
    agent_command, dashboard_command, export_command, health_command, history_command,
    maps_command, scrape_command, settings_command, show_command, AgentArgs, ExportArgs,
    HistoryArgs, MapsArgs, ScrapeArgs, SettingsAction, ShowArgs,
};
use config::CliConfigLoader;

/// toolzz - terminal client for the Toolzz scraping API
#[derive(Parser)]
#[command(name = "toolzz")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Scrape pages with AI instructions, browse history and export results")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file or directory path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL override
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// API key override
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether the backend is reachable
    Health,

    /// Scrape a page with an AI instruction
    Scrape(ScrapeArgs),

    /// Run the step-by-step browsing agent
    Agent(AgentArgs),

    /// Extract business leads from a Google Maps search
    Maps(MapsArgs),

    /// Browse stored runs
    History(HistoryArgs),

    /// Overview of recent activity
    Dashboard {
        /// Print the statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render a saved result file or a stored run
    Show(ShowArgs),

    /// Export a saved result as JSON or CSV
    Export(ExportArgs),

    /// Manage the locally stored API key
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

/// Build a configuration loader from CLI arguments
fn build_config_loader(cli: &Cli) -> CliConfigLoader {
    let mut loader = CliConfigLoader::new();

    if let Some(config_path) = &cli.config {
        loader = loader.with_config_override(config_path.clone());
    }

    if let Some(api_key) = &cli.api_key {
        loader = loader.with_api_key_override(api_key.clone());
    }

    if let Some(base_url) = &cli.base_url {
        loader = loader.with_base_url_override(base_url.clone());
    }

    loader
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    toolzz_core::init_tracing_with_debug(cli.verbose);

    let config_loader = build_config_loader(&cli);

    match cli.command {
        Commands::Health => health_command(config_loader).await,
        Commands::Scrape(args) => scrape_command(config_loader, args).await,
        Commands::Agent(args) => agent_command(config_loader, args).await,
        Commands::Maps(args) => maps_command(config_loader, args).await,
        Commands::History(args) => history_command(config_loader, args).await,
        Commands::Dashboard { json } => dashboard_command(config_loader, json).await,
        Commands::Show(args) => show_command(config_loader, args).await,
        Commands::Export(args) => export_command(args).await,
        Commands::Settings { action } => settings_command(config_loader, action).await,
    }
}
