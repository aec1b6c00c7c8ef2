//! Display and export of saved or stored results

use super::history::load_history;
use super::run::{connect, present_result, save_export, RunOutputArgs};
use crate::config::CliConfigLoader;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use toolzz_core::api::HistoryQuery;
use toolzz_core::export::ExportFormat;
use toolzz_core::result::HistoryRecord;
use toolzz_core::stats::DASHBOARD_HISTORY_LIMIT;
use toolzz_core::ScrapeResult;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Result or history record JSON file
    #[arg(required_unless_present = "id", conflicts_with = "id")]
    pub file: Option<PathBuf>,

    /// Id (or id prefix) of a stored run
    #[arg(long)]
    pub id: Option<String>,

    #[command(flatten)]
    pub output: RunOutputArgs,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Result or history record JSON file
    pub file: PathBuf,

    /// Export format (json, csv)
    #[arg(short, long, default_value = "json")]
    pub format: ExportFormat,

    /// Directory the file is written into
    #[arg(short, long, default_value = ".")]
    pub out_dir: PathBuf,
}

/// Read a saved result. History records are unwrapped to their payload.
pub async fn load_result_file(path: &Path) -> Result<ScrapeResult> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read result file: {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse result file: {}", path.display()))?;

    Ok(unwrap_record(value))
}

/// A document with a `payload` object and no `success` flag is a history record
fn unwrap_record(value: serde_json::Value) -> ScrapeResult {
    let is_record = value.get("success").is_none()
        && value.get("payload").map(|p| p.is_object()).unwrap_or(false);
    if is_record {
        HistoryRecord::new(value).payload()
    } else {
        ScrapeResult::new(value)
    }
}

/// Find a stored run by id or id prefix
fn find_record<'a>(records: &'a [HistoryRecord], id: &str) -> Option<&'a HistoryRecord> {
    let id = id.trim();
    records
        .iter()
        .find(|r| r.id().as_deref() == Some(id))
        .or_else(|| {
            records
                .iter()
                .find(|r| r.id().map(|rid| rid.starts_with(id)).unwrap_or(false))
        })
}

/// Render a saved result file or a stored run
pub async fn show_command(loader: CliConfigLoader, args: ShowArgs) -> Result<()> {
    let result = match (&args.file, &args.id) {
        (Some(path), _) => load_result_file(path).await?,
        (None, Some(id)) => {
            let backend = connect(&loader).await?;
            let query = HistoryQuery::new().with_limit(DASHBOARD_HISTORY_LIMIT);
            let records = load_history(&backend, &query).await;
            find_record(&records, id)
                .map(HistoryRecord::payload)
                .ok_or_else(|| anyhow!("Registro não encontrado: {}", id))?
        }
        (None, None) => return Err(anyhow!("Informe um arquivo ou --id")),
    };

    present_result(&result, &args.output).await
}

/// Export a saved result without contacting the backend
pub async fn export_command(args: ExportArgs) -> Result<()> {
    let result = load_result_file(&args.file).await?;
    save_export(&result, args.format, &args.out_dir).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_history_record_files_are_unwrapped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("record.json");
        tokio::fs::write(
            &path,
            json!({"id": "abc", "payload": {"success": true, "record_id": 5}}).to_string(),
        )
        .await
        .unwrap();

        let result = load_result_file(&path).await.unwrap();
        assert!(result.is_success());
        assert_eq!(result.identity(), "5");
    }

    #[tokio::test]
    async fn test_plain_result_and_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.json");
        tokio::fs::write(&path, r#"{"success": false, "payload": {}}"#)
            .await
            .unwrap();
        let result = load_result_file(&path).await.unwrap();
        assert_eq!(result.as_value()["success"], false);

        let bad = dir.path().join("bad.json");
        tokio::fs::write(&bad, "not json").await.unwrap();
        assert!(load_result_file(&bad).await.is_err());
    }

    #[test]
    fn test_find_record_by_prefix() {
        let records = vec![
            HistoryRecord::new(json!({"id": "4f2a9c1e-0001"})),
            HistoryRecord::new(json!({"id": "4f2a"})),
            HistoryRecord::new(json!({"id": 77})),
        ];
        assert_eq!(find_record(&records, "4f2a").unwrap().as_value()["id"], "4f2a");
        assert_eq!(
            find_record(&records, "4f2a9").unwrap().as_value()["id"],
            "4f2a9c1e-0001"
        );
        assert!(find_record(&records, "77").is_some());
        assert!(find_record(&records, "zz").is_none());
    }
}
