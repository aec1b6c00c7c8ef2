//! Presentation-ready view model of a Scrape Result
//!
//! `ResultView::build` is a pure function of the result document. Renderers
//! only lay out the strings decided here.

use super::finding::NormalizedFinding;
use super::model::ScrapeResult;
use super::value::{display, is_truthy, present};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// Placeholder for lead-card fields the backend did not fill
pub const NOT_AVAILABLE: &str = "Não disponível";

/// Hint shown instead of an empty findings list
pub const NO_ITEMS_HINT: &str = "Nenhum item estruturado encontrado para exibir.";

/// Generic cards show at most this many `extra` chips
pub const MAX_CHIPS: usize = 8;

/// Website labels are cut to this many characters
const WEBSITE_LABEL_LEN: usize = 40;

/// Whole view of one result
#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub kpis: Kpis,
    pub outcome: Outcome,
    /// Agent steps, empty for plain scrapes
    pub steps: Vec<StepView>,
    /// The whole document, pretty-printed
    pub raw_json: String,
}

/// KPI tiles
#[derive(Debug, Clone, PartialEq)]
pub struct Kpis {
    pub success: bool,
    pub status: &'static str,
    pub duration: String,
    pub cost: String,
    /// Lead count, only for non-empty Maps results
    pub leads: Option<usize>,
    pub tokens: String,
    pub quality: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Failure {
        error: String,
        error_type: String,
    },
    Success {
        summary: Option<String>,
        findings: FindingsView,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum FindingsView {
    /// No findings; carries the hint to show
    Empty { hint: &'static str },
    Generic(Vec<GenericCard>),
    Leads(Vec<LeadCard>),
}

impl FindingsView {
    pub fn len(&self) -> usize {
        match self {
            FindingsView::Empty { .. } => 0,
            FindingsView::Generic(cards) => cards.len(),
            FindingsView::Leads(cards) => cards.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Title / description / URL / chips template
#[derive(Debug, Clone, PartialEq)]
pub struct GenericCard {
    pub title: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub chips: Vec<(String, String)>,
}

/// Maps lead template
#[derive(Debug, Clone, PartialEq)]
pub struct LeadCard {
    pub title: String,
    pub category: Option<String>,
    pub rating: Option<String>,
    pub price_level: Option<String>,
    pub description: Option<String>,
    pub phone: Option<String>,
    /// Website link target
    pub website: Option<String>,
    /// Website as displayed: scheme and `www.` stripped, shortened
    pub website_label: Option<String>,
    pub address: Option<String>,
    /// e.g. `"120 avaliações"`
    pub reviews: Option<String>,
    pub hours: Option<String>,
    pub maps_url: Option<String>,
}

impl LeadCard {
    pub fn phone_or_placeholder(&self) -> &str {
        self.phone.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    pub fn website_or_placeholder(&self) -> &str {
        self.website_label.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    pub fn address_or_placeholder(&self) -> &str {
        self.address.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    pub fn reviews_or_placeholder(&self) -> &str {
        self.reviews.as_deref().unwrap_or(NOT_AVAILABLE)
    }
}

/// One agent step
#[derive(Debug, Clone, PartialEq)]
pub struct StepView {
    pub index: String,
    pub action: String,
    pub current_url: String,
    pub success: Option<bool>,
    pub error: Option<String>,
}

/// `2.50s`, or `-` when absent
pub fn format_duration(seconds: Option<f64>) -> String {
    match seconds {
        Some(s) => format!("{:.2}s", s),
        None => "-".to_string(),
    }
}

/// `$0.1000`, or `$0.0000` when absent
pub fn format_cost(cost: Option<f64>) -> String {
    format!("${:.4}", cost.unwrap_or(0.0))
}

/// Strip scheme and `www.` from a website and cut it for display
pub fn website_label(website: &str) -> String {
    static PREFIX: OnceLock<Option<Regex>> = OnceLock::new();
    let stripped = match PREFIX.get_or_init(|| Regex::new(r"^https?://(www\.)?").ok()) {
        Some(prefix) => prefix.replace(website, "").into_owned(),
        None => website.to_string(),
    };
    stripped.chars().take(WEBSITE_LABEL_LEN).collect()
}

/// Display a value only when it is truthy
fn truthy_display(value: Option<&Value>) -> Option<String> {
    value.filter(|v| is_truthy(v)).map(display)
}

impl ResultView {
    /// Build the view of a result document. Never fails.
    pub fn build(result: &ScrapeResult) -> Self {
        let findings = NormalizedFinding::normalize_all(result.findings());
        let is_maps = result.is_map_source();
        let success = result.is_success();

        let kpis = Kpis {
            success,
            status: if success { "Sucesso" } else { "Falha" },
            duration: format_duration(result.duration_seconds()),
            cost: format_cost(result.cost_usd()),
            leads: (is_maps && !findings.is_empty()).then_some(findings.len()),
            tokens: result
                .tokens_total()
                .map(display)
                .unwrap_or_else(|| "0".to_string()),
            quality: result.quality_score().map(|q| format!("{:.2}", q)),
        };

        let outcome = if success {
            Outcome::Success {
                summary: result.summary().map(str::to_string),
                findings: Self::findings_view(&findings, is_maps),
            }
        } else {
            Outcome::Failure {
                error: result.error_message(),
                error_type: result.error_type(),
            }
        };

        let steps = result
            .steps()
            .iter()
            .enumerate()
            .map(|(position, step)| Self::step_view(position, step))
            .collect();

        let raw_json = serde_json::to_string_pretty(result.as_value())
            .unwrap_or_else(|_| result.as_value().to_string());

        Self {
            kpis,
            outcome,
            steps,
            raw_json,
        }
    }

    /// Build from a raw JSON value
    pub fn from_value(value: &Value) -> Self {
        Self::build(&ScrapeResult::new(value.clone()))
    }

    fn findings_view(findings: &[NormalizedFinding], is_maps: bool) -> FindingsView {
        if findings.is_empty() {
            return FindingsView::Empty {
                hint: NO_ITEMS_HINT,
            };
        }

        if is_maps {
            FindingsView::Leads(
                findings
                    .iter()
                    .enumerate()
                    .map(|(idx, finding)| Self::lead_card(idx, finding))
                    .collect(),
            )
        } else {
            FindingsView::Generic(
                findings
                    .iter()
                    .enumerate()
                    .map(|(idx, finding)| Self::generic_card(idx, finding))
                    .collect(),
            )
        }
    }

    fn generic_card(idx: usize, finding: &NormalizedFinding) -> GenericCard {
        GenericCard {
            title: finding
                .title()
                .map(display)
                .unwrap_or_else(|| format!("Item {}", idx + 1)),
            description: truthy_display(finding.description()),
            url: truthy_display(finding.url()),
            chips: finding
                .extra
                .iter()
                .take(MAX_CHIPS)
                .map(|(key, value)| (key.clone(), display(value)))
                .collect(),
        }
    }

    fn lead_card(idx: usize, finding: &NormalizedFinding) -> LeadCard {
        let website = truthy_display(finding.get("website"));
        LeadCard {
            title: finding
                .title()
                .map(display)
                .unwrap_or_else(|| format!("Lead {}", idx + 1)),
            category: truthy_display(finding.get("category")),
            rating: finding.get("rating").map(display),
            price_level: truthy_display(finding.get_any(&["price_level", "priceLevel"])),
            description: truthy_display(finding.description()),
            phone: truthy_display(finding.get("phone")),
            website_label: website.as_deref().map(website_label),
            website,
            address: truthy_display(finding.get("address")),
            reviews: truthy_display(finding.get_any(&["reviews_count", "reviewsCount"]))
                .map(|count| format!("{} avaliações", count)),
            hours: truthy_display(finding.get("hours")),
            maps_url: truthy_display(finding.url()),
        }
    }

    fn step_view(position: usize, step: &Value) -> StepView {
        let field = |key: &str| present(step.get(key));
        StepView {
            index: field("step_index")
                .map(display)
                .unwrap_or_else(|| position.to_string()),
            action: present(step.get("action").and_then(|a| a.get("action")))
                .map(display)
                .unwrap_or_else(|| "-".to_string()),
            current_url: field("current_url")
                .map(display)
                .unwrap_or_else(|| "-".to_string()),
            success: step.get("success").and_then(Value::as_bool),
            error: truthy_display(field("error")),
        }
    }
}
