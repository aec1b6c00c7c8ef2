//! Shared execution and presentation of a single scrape or agent run

use crate::config::CliConfigLoader;
use crate::output::notify;
use crate::output::progress::lock_log;
use crate::output::text_utils::get_terminal_width;
use crate::output::{ResultFormatter, RunLog, SharedRunLog, StageTicker};
use anyhow::Result;
use clap::Args;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use toolzz_core::api::{AgentRequest, ScrapeRequest};
use toolzz_core::error::ExportError;
use toolzz_core::export::{export_to_dir, ExportFormat};
use toolzz_core::{Error, HttpBackend, ResultView, ScrapeBackend, ScrapeResult};
use tracing::{info, warn};

/// Output options shared by result-producing commands
#[derive(Args, Debug, Clone, Default)]
pub struct RunOutputArgs {
    /// Print the raw result JSON only
    #[arg(long)]
    pub json: bool,

    /// Also print the pretty-printed raw JSON after the rendered result
    #[arg(long)]
    pub raw: bool,

    /// Save the result as scrape_result_<id>.json into this directory
    #[arg(long, value_name = "DIR")]
    pub save_json: Option<PathBuf>,

    /// Save the findings as scrape_data_<id>.csv into this directory
    #[arg(long, value_name = "DIR")]
    pub save_csv: Option<PathBuf>,
}

/// One pending request
#[derive(Debug, Clone)]
pub enum Job {
    Scrape(ScrapeRequest),
    Agent(AgentRequest),
}

impl Job {
    pub fn url(&self) -> &str {
        match self {
            Job::Scrape(request) => &request.url,
            Job::Agent(request) => &request.url,
        }
    }

    /// System prompt preset, or the agent strategy
    pub fn system_prompt(&self) -> &str {
        match self {
            Job::Scrape(request) => &request.prompt,
            Job::Agent(request) => &request.strategy,
        }
    }
}

/// Build the backend client from the resolved configuration
pub async fn connect(loader: &CliConfigLoader) -> Result<HttpBackend> {
    let config = loader.load().await?;
    info!("Using backend at {}", config.base_url);
    Ok(HttpBackend::new(config)?)
}

/// Send the job and wait for its result while the stage ticker runs.
///
/// Transport failures become a synthesized failure result, so this never
/// fails.
pub async fn execute_job(backend: &dyn ScrapeBackend, job: &Job, quiet: bool) -> ScrapeResult {
    let log: SharedRunLog = Arc::new(Mutex::new(RunLog::new(quiet)));
    {
        let mut log = lock_log(&log);
        log.add(format!("Iniciando tarefa para: {}", job.url()));
        log.add(format!("Prompt do Sistema: {}", job.system_prompt()));
        log.add("Conectando ao backend...");
    }

    let ticker = StageTicker::start(log.clone(), quiet);
    let outcome = match job {
        Job::Scrape(request) => backend.scrape(request).await,
        Job::Agent(request) => backend.scrape_agent(request).await,
    };
    ticker.finish();

    let mut log = lock_log(&log);
    let result = match outcome {
        Ok(result) => {
            log.add("Resposta recebida. Processando dados...");
            if result.is_success() {
                notify::success("Scraping concluído!");
                log.add("Sucesso! Dados extraídos.");
                let tokens = ResultView::build(&result).kpis.tokens;
                log.add(format!("Tokens usados: {}", tokens));
            } else {
                let error = result.error_message();
                notify::error(&format!("Falha no scraping: {}", error));
                log.add(format!("Erro: {}", error));
            }
            result
        }
        Err(e) => {
            warn!("Request to {} failed: {}", backend.name(), e);
            notify::error("Erro de conexão com o servidor.");
            log.add(format!("Erro Crítico: {}", e));
            ScrapeResult::transport_failure(&e)
        }
    };
    log.add("Processo finalizado.");

    result
}

/// Print a result and write the requested export files
pub async fn present_result(result: &ScrapeResult, output: &RunOutputArgs) -> Result<()> {
    if output.json {
        println!("{}", serde_json::to_string_pretty(result.as_value())?);
    } else {
        let view = ResultView::build(result);
        println!(
            "{}",
            ResultFormatter::new(get_terminal_width()).format(&view, output.raw)
        );
    }

    if let Some(dir) = &output.save_json {
        save_export(result, ExportFormat::Json, dir).await?;
    }
    if let Some(dir) = &output.save_csv {
        save_export(result, ExportFormat::Csv, dir).await?;
    }

    Ok(())
}

/// Export one file and notify. A CSV export without findings only notifies.
pub async fn save_export(result: &ScrapeResult, format: ExportFormat, dir: &Path) -> Result<()> {
    match export_to_dir(result, format, dir).await {
        Ok(path) => {
            let message = match format {
                ExportFormat::Json => "JSON baixado!",
                ExportFormat::Csv => "CSV baixado!",
            };
            notify::success(&format!("{} {}", message, path.display()));
            Ok(())
        }
        Err(Error::Export(ExportError::NoFindings)) => {
            notify::error(&ExportError::NoFindings.to_string());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Run a job end to end
pub async fn run_job(backend: &HttpBackend, job: Job, output: &RunOutputArgs) -> Result<()> {
    let result = execute_job(backend, &job, output.json).await;
    present_result(&result, output).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use toolzz_core::api::HistoryQuery;
    use toolzz_core::result::HistoryRecord;
    use toolzz_core::ApiHealth;

    /// Backend answering the next run with a canned outcome
    struct FixedBackend {
        answer: Mutex<Option<Result<ScrapeResult, Error>>>,
    }

    impl FixedBackend {
        fn new(answer: Result<ScrapeResult, Error>) -> Self {
            Self {
                answer: Mutex::new(Some(answer)),
            }
        }

        fn take(&self) -> Result<ScrapeResult, Error> {
            self.answer
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Err(Error::Generic("called twice".to_string())))
        }
    }

    #[async_trait]
    impl ScrapeBackend for FixedBackend {
        async fn health(&self) -> ApiHealth {
            ApiHealth::Ok
        }

        async fn history(&self, _query: &HistoryQuery) -> Result<Vec<HistoryRecord>, Error> {
            Ok(Vec::new())
        }

        async fn scrape(&self, _request: &ScrapeRequest) -> Result<ScrapeResult, Error> {
            self.take()
        }

        async fn scrape_agent(&self, _request: &AgentRequest) -> Result<ScrapeResult, Error> {
            self.take()
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn job() -> Job {
        Job::Scrape(ScrapeRequest::new("https://example.com", "x"))
    }

    #[tokio::test]
    async fn test_transport_error_becomes_failure_result() {
        let backend = FixedBackend::new(Err(Error::Generic("connection refused".to_string())));
        let result = execute_job(&backend, &job(), true).await;

        assert!(!result.is_success());
        assert_eq!(
            result.error_message(),
            "Falha de conexão com API: connection refused"
        );
    }

    #[tokio::test]
    async fn test_backend_result_is_passed_through() {
        let answer = ScrapeResult::new(json!({"success": false, "error": "blocked"}));
        let backend = FixedBackend::new(Ok(answer.clone()));
        let result = execute_job(&backend, &job(), true).await;
        assert_eq!(result, answer);
    }

    #[tokio::test]
    async fn test_csv_without_findings_only_notifies() {
        let dir = tempfile::tempdir().unwrap();
        let result = ScrapeResult::new(json!({"success": true}));
        save_export(&result, ExportFormat::Csv, dir.path())
            .await
            .unwrap();
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

        save_export(&result, ExportFormat::Json, dir.path())
            .await
            .unwrap();
        assert!(dir.path().join("scrape_result_data.json").exists());
    }

    #[test]
    fn test_job_accessors() {
        let job = Job::Agent(AgentRequest::new(" https://a.example ", "goal"));
        assert_eq!(job.url(), "https://a.example");
        assert_eq!(job.system_prompt(), "generic");
    }
}
