//! Backend API module
//!
//! Typed request payloads, the backend trait and its HTTP implementation.

pub mod backend;
pub mod http;
pub mod request;

pub use backend::{ApiHealth, HistoryPage, ScrapeBackend};
pub use http::HttpBackend;
pub use request::{
    AgentRequest, HistoryQuery, OutputFormat, ScrapeRequest, StatusFilter, DEFAULT_HISTORY_LIMIT,
};
