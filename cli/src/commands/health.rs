//! Backend health check command

use super::run::connect;
use crate::config::CliConfigLoader;
use anyhow::Result;
use colored::Colorize;
use toolzz_core::ScrapeBackend;
use tracing::info;

/// Probe `/health` and print the API status
pub async fn health_command(loader: CliConfigLoader) -> Result<()> {
    let backend = connect(&loader).await?;
    let health = backend.health().await;
    info!("Health of {}: {:?}", backend.name(), health);

    let label = if health.is_ok() {
        health.label().green().bold()
    } else {
        health.label().red().bold()
    };
    println!("API: {} ({})", label, backend.config().base_url);

    Ok(())
}
