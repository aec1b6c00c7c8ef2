//! reqwest implementation of the scraping backend

use super::backend::{ApiHealth, HistoryPage, ScrapeBackend};
use super::request::{AgentRequest, HistoryQuery, ScrapeRequest};
use crate::config::ResolvedClientConfig;
use crate::error::{ApiError, Error, Result};
use crate::result::{HistoryRecord, ScrapeResult};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use tracing::{debug, warn};

/// Header carrying a per-request correlation id
const REQUEST_ID_HEADER: &str = "x-request-id";

/// HTTP client for the backend API
pub struct HttpBackend {
    client: Client,
    config: ResolvedClientConfig,
}

impl HttpBackend {
    /// Create a new backend client from resolved config
    pub fn new(config: ResolvedClientConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        for (key, value) in &config.headers {
            let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
                ApiError::InvalidRequest {
                    message: format!("Invalid header name '{}': {}", key, e),
                }
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| ApiError::InvalidRequest {
                message: format!("Invalid value for header '{}': {}", key, e),
            })?;
            headers.insert(name, value);
        }

        let mut builder = Client::builder()
            .default_headers(headers)
            .user_agent(concat!("toolzz/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ResolvedClientConfig {
        &self.config
    }

    /// Send a request tagged with a fresh correlation id
    async fn send(&self, request: RequestBuilder, path: &str) -> Result<Response> {
        let request_id = uuid::Uuid::new_v4().to_string();
        debug!("{} {} [{}]", self.config.base_url, path, request_id);

        let response = request
            .header(REQUEST_ID_HEADER, request_id.as_str())
            .send()
            .await
            .map_err(|e| {
                warn!("Request to {} failed [{}]: {}", path, request_id, e);
                Error::Api(ApiError::Network {
                    message: e.to_string(),
                })
            })?;

        debug!(
            "{} answered {} [{}]",
            path,
            response.status(),
            request_id
        );
        Ok(response)
    }

    /// Read a JSON body regardless of status code. The backend reports
    /// application failures inside the document, so only an unparsable
    /// body is an error here.
    async fn json_body(response: Response, path: &str) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            warn!("{} returned HTTP {}", path, status);
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            let message = if status.is_success() {
                format!("{} returned a non-JSON body: {}", path, e)
            } else {
                format!("{} returned HTTP {} with a non-JSON body", path, status.as_u16())
            };
            Error::Api(ApiError::InvalidResponse { message })
        })
    }

    async fn post_json<T: serde::Serialize + Sync>(&self, path: &str, body: &T) -> Result<Value> {
        let request = self.client.post(self.config.endpoint(path)).json(body);
        let response = self.send(request, path).await?;
        Self::json_body(response, path).await
    }
}

#[async_trait]
impl ScrapeBackend for HttpBackend {
    async fn health(&self) -> ApiHealth {
        let path = "/health";
        let request = self.client.get(self.config.endpoint(path));
        match self.send(request, path).await {
            Ok(response) if response.status().is_success() => ApiHealth::Ok,
            Ok(response) => {
                debug!("Health check answered {}", response.status());
                ApiHealth::Down
            }
            Err(_) => ApiHealth::Down,
        }
    }

    async fn history(&self, query: &HistoryQuery) -> Result<Vec<HistoryRecord>> {
        let path = "/api/history";
        let request = self
            .client
            .get(self.config.endpoint(path))
            .query(&query.to_query_pairs());
        let response = self.send(request, path).await?;
        let body = Self::json_body(response, path).await?;
        Ok(HistoryPage::from_value(&body).items)
    }

    async fn scrape(&self, request: &ScrapeRequest) -> Result<ScrapeResult> {
        debug!("Scraping {} with prompt preset {}", request.url, request.prompt);
        let body = self.post_json("/api/scrape", request).await?;
        Ok(ScrapeResult::new(body))
    }

    async fn scrape_agent(&self, request: &AgentRequest) -> Result<ScrapeResult> {
        debug!(
            "Running agent on {} (max {} steps)",
            request.url, request.max_steps
        );
        let body = self.post_json("/api/scrape-agent", request).await?;
        Ok(ScrapeResult::new(body))
    }

    fn name(&self) -> &str {
        &self.config.base_url
    }
}
