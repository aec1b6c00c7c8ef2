//! # toolzz Core
//!
//! Core library for toolzz - a terminal client for the Toolzz scraping and
//! extraction API.
//!
//! This library provides the typed plumbing for talking to the backend, the
//! result normalizer that turns an untrusted JSON result into a
//! presentation-ready view model, and CSV/JSON export of displayed results.

// Core modules
pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod presets;
pub mod result;
pub mod stats;

// Re-export commonly used types
pub use api::{ApiHealth, HistoryQuery, HttpBackend, ScrapeBackend, StatusFilter};
pub use config::{CredentialStore, ResolvedClientConfig};
pub use error::{Error, Result};
pub use result::{NormalizedFinding, ResultView, ScrapeResult};

/// Current version of the toolzz-core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize tracing on stderr, so rendered results and `--json` output
/// stay alone on stdout
pub fn init_tracing_with_debug(debug: bool) {
    let filter = if debug { "debug" } else { "warn" };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();
}
