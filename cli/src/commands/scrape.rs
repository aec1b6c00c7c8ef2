//! Scrape, agent and Maps library commands

use super::run::{connect, run_job, Job, RunOutputArgs};
use crate::config::CliConfigLoader;
use crate::output::notify;
use anyhow::{anyhow, Result};
use clap::Args;
use toolzz_core::api::{AgentRequest, OutputFormat, ScrapeRequest};
use toolzz_core::presets::{
    detect_system_prompt, prompt_template, validate_url, MapsPreset, DEFAULT_USER_PROMPT,
    GENERIC_PROMPT, MANUAL_SOURCE, PROMPT_TEMPLATES,
};
use tracing::info;

#[derive(Args, Debug)]
pub struct ScrapeArgs {
    /// Target URL
    pub url: String,

    /// Instruction for the AI
    #[arg(short, long, conflicts_with = "template")]
    pub prompt: Option<String>,

    /// Named instruction template (products, article, contacts, offers, custom)
    #[arg(short, long)]
    pub template: Option<String>,

    /// System prompt preset; detected from the URL when omitted
    #[arg(short, long)]
    pub system_prompt: Option<String>,

    /// Output format requested from the AI (list, summary, report)
    #[arg(short = 'f', long, default_value = "list")]
    pub format: OutputFormat,

    /// Source tag stored with the run
    #[arg(long, default_value = MANUAL_SOURCE)]
    pub source: String,

    #[command(flatten)]
    pub output: RunOutputArgs,
}

#[derive(Args, Debug)]
pub struct AgentArgs {
    /// Target URL
    pub url: String,

    /// Goal for the browsing agent
    #[arg(short, long)]
    pub goal: Option<String>,

    /// Maximum number of agent steps
    #[arg(long)]
    pub max_steps: Option<u32>,

    #[command(flatten)]
    pub output: RunOutputArgs,
}

#[derive(Args, Debug)]
pub struct MapsArgs {
    /// Search term, e.g. "padarias em São Paulo"
    pub term: String,

    #[command(flatten)]
    pub output: RunOutputArgs,
}

/// Resolve the user instruction from an explicit prompt or a template name
fn resolve_user_prompt(prompt: Option<String>, template: Option<&str>) -> Result<String> {
    if let Some(prompt) = prompt.filter(|p| !p.trim().is_empty()) {
        return Ok(prompt);
    }
    match template {
        Some(name) => prompt_template(name).map(str::to_string).ok_or_else(|| {
            let names: Vec<&str> = PROMPT_TEMPLATES.iter().map(|(name, _)| *name).collect();
            anyhow!(
                "Unknown template '{}'. Available templates: {}",
                name,
                names.join(", ")
            )
        }),
        None => Ok(DEFAULT_USER_PROMPT.to_string()),
    }
}

/// Resolve the system prompt, announcing auto-detected modes
fn resolve_system_prompt(explicit: Option<String>, url: &str, quiet: bool) -> String {
    if let Some(prompt) = explicit.filter(|p| !p.trim().is_empty()) {
        return prompt;
    }
    match detect_system_prompt(url) {
        Some(detected) => {
            if !quiet {
                let mode = match detected {
                    "ecommerce" => "Modo E-commerce ativado",
                    _ => "Modo Notícias ativado",
                };
                notify::info(mode);
            }
            detected.to_string()
        }
        None => GENERIC_PROMPT.to_string(),
    }
}

/// Single-page scrape
pub async fn scrape_command(loader: CliConfigLoader, args: ScrapeArgs) -> Result<()> {
    let url = validate_url(&args.url)?;
    let user_prompt = resolve_user_prompt(args.prompt, args.template.as_deref())?;
    let system_prompt = resolve_system_prompt(args.system_prompt, &url, args.output.json);

    let backend = connect(&loader).await?;
    let request = ScrapeRequest::new(url, user_prompt)
        .with_system_prompt(system_prompt)
        .with_output_format(Some(args.format))
        .with_api_key(backend.config().api_key.clone())
        .with_source(Some(args.source));

    info!("Scraping {} with prompt {}", request.url, request.prompt);
    run_job(&backend, Job::Scrape(request), &args.output).await
}

/// Step-by-step browsing agent
pub async fn agent_command(loader: CliConfigLoader, args: AgentArgs) -> Result<()> {
    let url = validate_url(&args.url)?;
    let goal = args
        .goal
        .filter(|g| !g.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_USER_PROMPT.to_string());

    let mut request = AgentRequest::new(url, goal);
    if let Some(max_steps) = args.max_steps {
        request.max_steps = max_steps;
    }

    let backend = connect(&loader).await?;
    info!("Running agent on {}", request.url);
    run_job(&backend, Job::Agent(request), &args.output).await
}

/// Google Maps lead extraction from the template library
pub async fn maps_command(loader: CliConfigLoader, args: MapsArgs) -> Result<()> {
    let preset = MapsPreset::new(&args.term)
        .ok_or_else(|| anyhow!("Por favor, preencha o termo de busca."))?;

    let backend = connect(&loader).await?;
    let request = ScrapeRequest::new(preset.url, preset.user_prompt)
        .with_system_prompt(preset.system_prompt)
        .with_output_format(Some(OutputFormat::List))
        .with_api_key(backend.config().api_key.clone())
        .with_source(Some(preset.source.to_string()));

    info!("Extracting Maps leads for '{}'", args.term.trim());
    run_job(&backend, Job::Scrape(request), &args.output).await
}
