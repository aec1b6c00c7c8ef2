//! History listing and dashboard commands

use super::run::connect;
use crate::config::CliConfigLoader;
use crate::output::{notify, DashboardFormatter, HistoryFormatter};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use toolzz_core::api::{HistoryQuery, StatusFilter, DEFAULT_HISTORY_LIMIT};
use toolzz_core::result::{HistoryRecord, HistoryRow};
use toolzz_core::stats::{DashboardStats, DASHBOARD_HISTORY_LIMIT};
use toolzz_core::ScrapeBackend;
use tracing::warn;

const HISTORY_LOAD_FAILED: &str = "Não foi possível carregar o histórico.";

#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Status filter (all, success, error)
    #[arg(short, long, default_value = "all")]
    pub status: StatusFilter,

    /// Only runs whose URL contains this text
    #[arg(short, long)]
    pub domain: Option<String>,

    /// Maximum number of records
    #[arg(short, long, default_value_t = DEFAULT_HISTORY_LIMIT)]
    pub limit: u32,

    /// Print the records as JSON
    #[arg(long)]
    pub json: bool,
}

/// Fetch history, turning a failure into a notification and an empty list
pub async fn load_history(backend: &dyn ScrapeBackend, query: &HistoryQuery) -> Vec<HistoryRecord> {
    match backend.history(query).await {
        Ok(records) => records,
        Err(e) => {
            warn!("History request failed: {}", e);
            notify::error(HISTORY_LOAD_FAILED);
            Vec::new()
        }
    }
}

/// List stored runs
pub async fn history_command(loader: CliConfigLoader, args: HistoryArgs) -> Result<()> {
    let backend = connect(&loader).await?;
    let query = HistoryQuery::new()
        .with_limit(args.limit)
        .with_status(args.status)
        .with_domain(args.domain);

    let records = load_history(&backend, &query).await;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "items": records }))?
        );
        return Ok(());
    }

    if records.is_empty() {
        println!("{}", "Nenhum registro encontrado.".dimmed());
        return Ok(());
    }

    let formatter = HistoryFormatter::new();
    for record in &records {
        println!("{}", formatter.format_row(&HistoryRow::build(record)));
    }
    println!(
        "\n{}",
        format!("{} registro(s). Use `toolzz show --id <ID>` para abrir um resultado.", records.len())
            .dimmed()
    );

    Ok(())
}

/// Overview of recent activity
pub async fn dashboard_command(loader: CliConfigLoader, json: bool) -> Result<()> {
    let backend = connect(&loader).await?;
    let health = backend.health().await;

    let query = HistoryQuery::new().with_limit(DASHBOARD_HISTORY_LIMIT);
    let records = match backend.history(&query).await {
        Ok(records) => records,
        Err(e) => {
            warn!("Failed to load dashboard data: {}", e);
            Vec::new()
        }
    };
    let stats = DashboardStats::from_records(&records);

    if json {
        let recent: Vec<serde_json::Value> = stats
            .recent
            .iter()
            .map(|run| {
                serde_json::json!({
                    "url": run.url,
                    "timestamp": run.timestamp,
                    "source": run.source,
                    "success": run.success,
                })
            })
            .collect();
        let body = serde_json::json!({
            "api": health.label(),
            "total": stats.total,
            "success_rate": stats.success_rate,
            "avg_duration": stats.avg_duration,
            "recent": recent,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    let api = if health.is_ok() {
        health.label().green()
    } else {
        health.label().red()
    };
    println!("API: {}  {}\n", api, backend.config().base_url.dimmed());
    println!("{}", DashboardFormatter::new().format(&stats));

    Ok(())
}
