//! Run log and stage ticker shown while a request is pending

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use toolzz_core::presets::{StageCycle, STAGE_INTERVAL_MS};
use tracing::debug;

/// Timestamped lines describing a single run
#[derive(Debug, Default)]
pub struct RunLog {
    lines: Vec<String>,
    quiet: bool,
}

impl RunLog {
    pub fn new(quiet: bool) -> Self {
        Self {
            lines: Vec::new(),
            quiet,
        }
    }

    /// Record a line and echo it to stderr unless quiet
    pub fn add(&mut self, message: impl AsRef<str>) {
        let line = self.record(message.as_ref());
        if !self.quiet {
            eprintln!("{}", line.dimmed());
        }
    }

    /// Record a line without echoing it; returns the formatted line
    fn record(&mut self, message: &str) -> String {
        let line = format!("[{}] {}", chrono::Local::now().format("%H:%M:%S"), message);
        debug!("{}", line);
        self.lines.push(line.clone());
        line
    }

    #[cfg(test)]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

/// Run log shared with the stage ticker task
pub type SharedRunLog = Arc<Mutex<RunLog>>;

pub fn lock_log(log: &SharedRunLog) -> MutexGuard<'_, RunLog> {
    match log.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Spinner cycling the execution stages until dropped
pub struct StageTicker {
    bar: ProgressBar,
    handle: JoinHandle<()>,
}

impl StageTicker {
    /// Start ticking. Must be called inside a tokio runtime.
    pub fn start(log: SharedRunLog, quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new_spinner()
        };
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg} {elapsed:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(Duration::from_millis(120));

        let mut cycle = StageCycle::new();
        bar.set_message(cycle.current());

        let ticker_bar = bar.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_millis(STAGE_INTERVAL_MS));
            // First tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                let stage = cycle.advance();
                ticker_bar.set_message(stage);
                let line = lock_log(&log).record(&format!("Executando: {}...", stage));
                ticker_bar.println(line.dimmed().to_string());
            }
        });

        Self { bar, handle }
    }

    /// Stop ticking and clear the spinner
    pub fn finish(self) {
        drop(self);
    }
}

impl Drop for StageTicker {
    fn drop(&mut self) {
        self.handle.abort();
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_log_lines_are_timestamped() {
        let mut log = RunLog::new(true);
        log.add("Conectando ao backend...");
        log.add("Processo finalizado.");

        assert_eq!(log.lines().len(), 2);
        let first = &log.lines()[0];
        assert!(first.starts_with('['));
        assert_eq!(&first[9..], "] Conectando ao backend...");
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_logs_each_stage_until_finished() {
        let log: SharedRunLog = Arc::new(Mutex::new(RunLog::new(true)));
        let ticker = StageTicker::start(log.clone(), true);

        tokio::time::sleep(Duration::from_millis(STAGE_INTERVAL_MS * 2 + 100)).await;
        ticker.finish();
        tokio::time::sleep(Duration::from_millis(STAGE_INTERVAL_MS * 2)).await;

        let log = lock_log(&log);
        assert_eq!(log.lines().len(), 2);
        assert!(log.lines()[0].ends_with("Executando: Navegando no site..."));
        assert!(log.lines()[1].ends_with("Executando: Capturando conteudo..."));
    }
}
