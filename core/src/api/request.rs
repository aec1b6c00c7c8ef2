//! Request payloads for the backend endpoints

use serde::{Deserialize, Serialize};

/// Default number of history records requested
pub const DEFAULT_HISTORY_LIMIT: u32 = 50;

/// Output shape requested from the AI step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    List,
    Summary,
    Report,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::List => "list",
            OutputFormat::Summary => "summary",
            OutputFormat::Report => "report",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "list" => Ok(OutputFormat::List),
            "summary" => Ok(OutputFormat::Summary),
            "report" => Ok(OutputFormat::Report),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

/// Body of `POST /api/scrape`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeRequest {
    pub url: String,
    pub schema: String,
    /// System prompt preset name
    pub prompt: String,
    /// Natural-language instruction for the AI
    pub user_prompt: String,
    pub wait_until: String,
    /// Page load timeout in milliseconds
    pub timeout: u32,
    pub screenshot_quality: u8,
    pub full_page: bool,
    pub auto_scroll: bool,
    pub scroll_steps: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_format: Option<OutputFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl ScrapeRequest {
    /// Create a request with the interface defaults
    pub fn new(url: impl Into<String>, user_prompt: impl Into<String>) -> Self {
        Self {
            url: url.into().trim().to_string(),
            schema: "guided_extract".to_string(),
            prompt: "generic".to_string(),
            user_prompt: user_prompt.into(),
            wait_until: "networkidle".to_string(),
            timeout: 30_000,
            screenshot_quality: 70,
            full_page: false,
            auto_scroll: true,
            scroll_steps: 6,
            output_format: Some(OutputFormat::List),
            api_key: None,
            source: Some("scraper_manual".to_string()),
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn with_output_format(mut self, format: Option<OutputFormat>) -> Self {
        self.output_format = format;
        self
    }

    /// Attach the client-side key, skipping blank values
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn with_source(mut self, source: Option<String>) -> Self {
        self.source = source;
        self
    }
}

/// Body of `POST /api/scrape-agent`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRequest {
    pub url: String,
    pub goal: String,
    pub schema: String,
    pub max_steps: u32,
    pub strategy: String,
    pub headless: bool,
}

impl AgentRequest {
    pub fn new(url: impl Into<String>, goal: impl Into<String>) -> Self {
        Self {
            url: url.into().trim().to_string(),
            goal: goal.into(),
            schema: "guided_extract".to_string(),
            max_steps: 8,
            strategy: "generic".to_string(),
            headless: true,
        }
    }
}

/// History status filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Success,
    Error,
}

impl std::str::FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "success" => Ok(StatusFilter::Success),
            "error" => Ok(StatusFilter::Error),
            other => Err(format!("Unknown status filter: {}", other)),
        }
    }
}

/// Query of `GET /api/history`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    pub limit: u32,
    pub status: StatusFilter,
    pub domain: Option<String>,
}

impl HistoryQuery {
    pub fn new() -> Self {
        Self {
            limit: DEFAULT_HISTORY_LIMIT,
            status: StatusFilter::All,
            domain: None,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn with_domain(mut self, domain: Option<String>) -> Self {
        self.domain = domain;
        self
    }

    /// Query parameters in request order. `success` is omitted for `All`,
    /// `domain` when blank.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("limit", self.limit.to_string())];
        match self.status {
            StatusFilter::All => {}
            StatusFilter::Success => pairs.push(("success", "true".to_string())),
            StatusFilter::Error => pairs.push(("success", "false".to_string())),
        }
        if let Some(domain) = self.domain.as_deref().map(str::trim) {
            if !domain.is_empty() {
                pairs.push(("domain", domain.to_string()));
            }
        }
        pairs
    }
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scrape_request_defaults_serialize() {
        let request = ScrapeRequest::new(" https://example.com ", "Liste os produtos");
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({
                "url": "https://example.com",
                "schema": "guided_extract",
                "prompt": "generic",
                "user_prompt": "Liste os produtos",
                "wait_until": "networkidle",
                "timeout": 30000,
                "screenshot_quality": 70,
                "full_page": false,
                "auto_scroll": true,
                "scroll_steps": 6,
                "output_format": "list",
                "source": "scraper_manual"
            })
        );
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let request = ScrapeRequest::new("https://example.com", "x")
            .with_output_format(None)
            .with_source(None)
            .with_api_key(Some("  ".to_string()));
        let body = serde_json::to_value(&request).unwrap();
        assert!(body.get("output_format").is_none());
        assert!(body.get("source").is_none());
        assert!(body.get("api_key").is_none());

        let request = request.with_api_key(Some("sk-live".to_string()));
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["api_key"], "sk-live");
    }

    #[test]
    fn test_agent_request_defaults() {
        let body = serde_json::to_value(AgentRequest::new("https://a.example", "Find prices")).unwrap();
        assert_eq!(body["schema"], "guided_extract");
        assert_eq!(body["max_steps"], 8);
        assert_eq!(body["strategy"], "generic");
        assert_eq!(body["headless"], true);
    }

    #[test]
    fn test_history_query_pairs() {
        let query = HistoryQuery::new()
            .with_status(StatusFilter::Error)
            .with_domain(Some(" openai.com ".to_string()));
        assert_eq!(
            query.to_query_pairs(),
            vec![
                ("limit", "50".to_string()),
                ("success", "false".to_string()),
                ("domain", "openai.com".to_string()),
            ]
        );

        let query = HistoryQuery::new()
            .with_limit(100)
            .with_domain(Some("   ".to_string()));
        assert_eq!(query.to_query_pairs(), vec![("limit", "100".to_string())]);

        let query = HistoryQuery::new().with_status(StatusFilter::Success);
        assert_eq!(query.to_query_pairs()[1], ("success", "true".to_string()));
    }

    #[test]
    fn test_filter_parsing() {
        assert_eq!("ERROR".parse::<StatusFilter>(), Ok(StatusFilter::Error));
        assert!("maybe".parse::<StatusFilter>().is_err());
        assert_eq!("report".parse::<OutputFormat>(), Ok(OutputFormat::Report));
    }
}
