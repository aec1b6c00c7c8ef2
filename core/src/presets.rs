//! Presets shared by the scrape commands
//!
//! Execution stage labels, prompt templates, system prompt detection, URL
//! validation and the Google Maps library preset.

use crate::result::MAPS_SOURCE_TAG;
use regex::Regex;
use std::sync::OnceLock;

/// Display-only stage labels cycled while a request is pending
pub const EXECUTION_STAGES: [&str; 5] = [
    "Preparando requisicao",
    "Navegando no site",
    "Capturando conteudo",
    "Processando com IA",
    "Validando e persistindo",
];

/// Interval between stage ticks, in milliseconds
pub const STAGE_INTERVAL_MS: u64 = 2_500;

/// Source tag of runs started from the manual scraper
pub const MANUAL_SOURCE: &str = "scraper_manual";

/// Default system prompt preset
pub const GENERIC_PROMPT: &str = "generic";

/// Instruction used when the user gives none
pub const DEFAULT_USER_PROMPT: &str =
    "Busque os dados mais relevantes desta pagina e retorne itens estruturados.";

/// Named user prompt templates
pub const PROMPT_TEMPLATES: [(&str, &str); 5] = [
    (
        "products",
        "Liste os 10 principais produtos com nome, preco, disponibilidade e URL.",
    ),
    (
        "article",
        "Extraia titulo, autor, data e os principais pontos do conteudo em itens objetivos.",
    ),
    (
        "contacts",
        "Extraia contatos visiveis (email, telefone, formulario, redes sociais) com links.",
    ),
    (
        "offers",
        "Capture ofertas em destaque com titulo, preco, desconto e validade quando existir.",
    ),
    ("custom", DEFAULT_USER_PROMPT),
];

/// Look up a prompt template by name
pub fn prompt_template(name: &str) -> Option<&'static str> {
    let name = name.trim().to_lowercase();
    PROMPT_TEMPLATES
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, text)| *text)
}

/// Endless iterator over `EXECUTION_STAGES`.
///
/// `current()` starts at the first stage; each `advance()` moves to the
/// next one and wraps around.
#[derive(Debug, Clone, Default)]
pub struct StageCycle {
    index: usize,
}

impl StageCycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &'static str {
        EXECUTION_STAGES[self.index]
    }

    pub fn advance(&mut self) -> &'static str {
        self.index = (self.index + 1) % EXECUTION_STAGES.len();
        self.current()
    }
}

impl Iterator for StageCycle {
    type Item = &'static str;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.advance())
    }
}

/// System prompt preset suggested by the target URL, if any
pub fn detect_system_prompt(url: &str) -> Option<&'static str> {
    let lower = url.to_lowercase();
    let contains_any = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));

    if contains_any(&["amazon", "mercadolivre", "shop", "store"]) {
        Some("ecommerce")
    } else if contains_any(&["news", "g1", "cnn", "bbc"]) {
        Some("news")
    } else {
        None
    }
}

/// Reasons a target URL is rejected before any request is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UrlRejection {
    #[error("Por favor, informe uma URL válida.")]
    Blank,
    #[error("URL inválida. Use o formato: https://example.com")]
    Malformed,
}

fn url_regex() -> Option<&'static Regex> {
    static URL_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    URL_REGEX
        .get_or_init(|| {
            // ASCII-only word classes and case folding
            Regex::new(r"(?i-u)^https?://([\w-]+\.)+[\w-]+(/[\w\-._~:/?#\[\]@!$&'()*+,;=%]*)?$").ok()
        })
        .as_ref()
}

/// Check a target URL and return it trimmed
pub fn validate_url(url: &str) -> Result<String, UrlRejection> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(UrlRejection::Blank);
    }
    match url_regex() {
        Some(re) if re.is_match(trimmed) => Ok(trimmed.to_string()),
        Some(_) => Err(UrlRejection::Malformed),
        // Without the pattern fall back to a plain parse
        None => url::Url::parse(trimmed)
            .ok()
            .filter(|u| matches!(u.scheme(), "http" | "https"))
            .map(|_| trimmed.to_string())
            .ok_or(UrlRejection::Malformed),
    }
}

/// Percent-encode like `encodeURIComponent`
fn encode_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// Google Maps lead extractor from the template library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapsPreset {
    pub url: String,
    pub system_prompt: &'static str,
    pub user_prompt: String,
    pub source: &'static str,
}

impl MapsPreset {
    pub const SYSTEM_PROMPT: &'static str = "google_maps_leads";
    pub const SEARCH_BASE: &'static str = "https://www.google.com/maps/search/";

    /// Build the preset for a search term. Blank terms yield `None`.
    pub fn new(term: &str) -> Option<Self> {
        let trimmed = term.trim();
        if trimmed.is_empty() {
            return None;
        }

        let user_prompt = format!(
            "Extraia leads de TODAS as empresas visiveis na busca por '{}'. Limitar a aproximadamente 100 resultados.\n\
             Para CADA empresa, use o campo 'title' para o nome e preencha o campo 'extra' com: phone (telefone), website (URL do site), address (endereço completo), rating (nota), reviews_count (total de avaliações), category (categoria do negócio), hours (horário) e price_level (nível de preço).\n\
             Se um campo não estiver visível, use null. NÃO invente dados.",
            term
        );

        Some(Self {
            url: format!("{}{}", Self::SEARCH_BASE, encode_component(trimmed)),
            system_prompt: Self::SYSTEM_PROMPT,
            user_prompt,
            source: MAPS_SOURCE_TAG,
        })
    }
}
