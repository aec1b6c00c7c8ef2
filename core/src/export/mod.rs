//! Export of a displayed result to `.json` and `.csv` files

pub mod csv;

use crate::error::{ExportError, Result};
use crate::result::ScrapeResult;
use std::path::{Path, PathBuf};
use tracing::info;

pub use csv::{collect_headers, findings_to_csv, result_to_csv};

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    /// File name for a result in this format
    pub fn file_name(&self, result: &ScrapeResult) -> String {
        match self {
            ExportFormat::Json => format!("scrape_result_{}.json", result.identity()),
            ExportFormat::Csv => format!("scrape_data_{}.csv", result.identity()),
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(format!("Unknown export format: {}", other)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The whole document with two-space indentation
pub fn result_to_json(result: &ScrapeResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result.as_value())?)
}

/// Render a result in the given format without touching the filesystem
pub fn render(result: &ScrapeResult, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => result_to_json(result),
        ExportFormat::Csv => Ok(result_to_csv(result)?),
    }
}

/// Write the export file into `dir` and return its path.
///
/// CSV export of a result without findings fails before any file is
/// created.
pub async fn export_to_dir<P: AsRef<Path>>(
    result: &ScrapeResult,
    format: ExportFormat,
    dir: P,
) -> Result<PathBuf> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(ExportError::MissingDirectory {
            path: dir.display().to_string(),
        }
        .into());
    }

    let content = render(result, format)?;
    let path = dir.join(format.file_name(result));
    tokio::fs::write(&path, content).await?;

    info!("Exported {} to {}", format, path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_json_export_round_trip() {
        let value = json!({
            "success": true,
            "record_id": 31,
            "metadata": {"cost_usd": 0.0021, "source": "scraper_manual"},
            "data": {"summary": "# Ok", "findings": [{"title": "Á", "extra": {"n": [1, 2]}}]}
        });
        let result = ScrapeResult::new(value.clone());
        let dir = tempdir().unwrap();

        let path = export_to_dir(&result, ExportFormat::Json, dir.path())
            .await
            .unwrap();
        assert_eq!(path.file_name().unwrap(), "scrape_result_31.json");

        let content = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(content.starts_with("{\n  \"success\": true"));
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, value);
    }

    #[tokio::test]
    async fn test_csv_export_file_name_and_content() {
        let result = ScrapeResult::new(json!({
            "data": {"findings": [{"title": "A", "extra": {"phone": "1"}}, {"title": "B"}]}
        }));
        let dir = tempdir().unwrap();

        let path = export_to_dir(&result, ExportFormat::Csv, dir.path())
            .await
            .unwrap();
        assert_eq!(path.file_name().unwrap(), "scrape_data_data.csv");
        let content = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(content, "title,phone\n\"A\",\"1\"\n\"B\",\"\"");
    }

    #[tokio::test]
    async fn test_csv_export_without_findings_writes_nothing() {
        let result = ScrapeResult::new(json!({"success": true, "id": 9}));
        let dir = tempdir().unwrap();

        let err = export_to_dir(&result, ExportFormat::Csv, dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Export(ExportError::NoFindings)));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_missing_directory() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        let result = ScrapeResult::new(json!({}));
        let err = export_to_dir(&result, ExportFormat::Json, &missing)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Export(ExportError::MissingDirectory { .. })
        ));
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("CSV".parse::<ExportFormat>(), Ok(ExportFormat::Csv));
        assert_eq!("json".parse::<ExportFormat>(), Ok(ExportFormat::Json));
        assert!("xml".parse::<ExportFormat>().is_err());
    }
}
