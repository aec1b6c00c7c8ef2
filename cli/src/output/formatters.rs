//! Formatting utilities for CLI output

use super::text_utils::{pad_to_width, truncate_to_width, wrap_text};
use colored::Colorize;
use toolzz_core::result::{
    FindingsView, GenericCard, HistoryRow, LeadCard, Outcome, ResultView, StepView, NOT_AVAILABLE,
};
use toolzz_core::stats::DashboardStats;

const DOT: &str = "⏺";
const INDENT: &str = "   ";

/// Width of the target column in history listings
const TARGET_COLUMN: usize = 48;

fn section(title: &str) -> String {
    format!("\n{}", title.bold().underline())
}

fn status_dot(success: bool) -> String {
    if success {
        DOT.green().to_string()
    } else {
        DOT.red().to_string()
    }
}

/// Result formatter: turns a view model into terminal text
pub struct ResultFormatter {
    width: usize,
}

impl ResultFormatter {
    pub fn new(width: usize) -> Self {
        Self { width }
    }

    /// Format the whole result: KPIs, outcome, agent steps and optionally raw JSON
    pub fn format(&self, view: &ResultView, include_raw: bool) -> String {
        let mut lines = vec![self.format_kpis(view)];

        match &view.outcome {
            Outcome::Failure { error, error_type } => {
                lines.push(section("Falha"));
                for line in wrap_text(error, self.width) {
                    lines.push(format!("{}{}", INDENT, line.red()));
                }
                lines.push(format!("{}Tipo: {}", INDENT, error_type.bold()));
            }
            Outcome::Success { summary, findings } => {
                if let Some(summary) = summary {
                    lines.push(section("Resumo da IA"));
                    lines.push(self.format_markdown(summary));
                }
                lines.push(self.format_findings(findings));
            }
        }

        if !view.steps.is_empty() {
            lines.push(section("Passos do agente"));
            lines.extend(view.steps.iter().map(|step| self.format_step(step)));
        }

        if include_raw {
            lines.push(section("JSON Bruto"));
            lines.push(view.raw_json.dimmed().to_string());
        }

        lines.join("\n")
    }

    /// KPI tiles on a single line
    pub fn format_kpis(&self, view: &ResultView) -> String {
        let kpis = &view.kpis;
        let status = if kpis.success {
            kpis.status.green().bold()
        } else {
            kpis.status.red().bold()
        };

        let mut tiles = vec![
            format!("{} Status: {}", status_dot(kpis.success), status),
            format!("Duração: {}", kpis.duration.bold()),
            format!("Custo: {}", kpis.cost.bold()),
        ];
        if let Some(leads) = kpis.leads {
            tiles.push(format!("Leads: {}", leads.to_string().bold()));
        }
        tiles.push(format!("Tokens: {}", kpis.tokens));
        if let Some(quality) = &kpis.quality {
            tiles.push(format!("Qualidade: {}", quality));
        }

        tiles.join("  │  ")
    }

    /// Light Markdown emphasis: headings in bold, list markers as bullets
    pub fn format_markdown(&self, markdown: &str) -> String {
        let mut out = Vec::new();
        for line in markdown.lines() {
            let trimmed = line.trim_start();
            if let Some(heading) = trimmed.strip_prefix('#') {
                let heading = heading.trim_start_matches('#').trim();
                out.push(format!("{}{}", INDENT, console::style(heading).bold().cyan()));
            } else if let Some(item) = trimmed
                .strip_prefix("- ")
                .or_else(|| trimmed.strip_prefix("* "))
            {
                let mut wrapped = wrap_text(item, self.width.saturating_sub(2)).into_iter();
                if let Some(first) = wrapped.next() {
                    out.push(format!("{}• {}", INDENT, first));
                }
                out.extend(wrapped.map(|rest| format!("{}  {}", INDENT, rest)));
            } else if trimmed.is_empty() {
                out.push(String::new());
            } else {
                out.extend(
                    wrap_text(&strip_emphasis(trimmed), self.width)
                        .into_iter()
                        .map(|l| format!("{}{}", INDENT, l)),
                );
            }
        }
        out.join("\n")
    }

    fn format_findings(&self, findings: &FindingsView) -> String {
        match findings {
            FindingsView::Empty { hint } => format!("\n{}{}", INDENT, hint.italic().dimmed()),
            FindingsView::Generic(cards) => {
                let mut out = vec![section(&format!("Itens ({})", cards.len()))];
                out.extend(cards.iter().map(|card| self.format_generic_card(card)));
                out.join("\n")
            }
            FindingsView::Leads(cards) => {
                let mut out = vec![section(&format!("Leads ({})", cards.len()))];
                out.extend(cards.iter().map(|card| self.format_lead_card(card)));
                out.join("\n")
            }
        }
    }

    pub fn format_generic_card(&self, card: &GenericCard) -> String {
        let mut lines = vec![format!("\n{} {}", "▸".cyan(), card.title.bold())];
        if let Some(description) = &card.description {
            lines.extend(
                wrap_text(description, self.width)
                    .into_iter()
                    .map(|l| format!("{}{}", INDENT, l)),
            );
        }
        if let Some(url) = &card.url {
            lines.push(format!("{}{}", INDENT, url.blue().underline()));
        }
        if !card.chips.is_empty() {
            let chips: Vec<String> = card
                .chips
                .iter()
                .map(|(key, value)| format!("[{}: {}]", key, value))
                .collect();
            lines.push(format!("{}{}", INDENT, chips.join(" ").dimmed()));
        }
        lines.join("\n")
    }

    pub fn format_lead_card(&self, card: &LeadCard) -> String {
        let mut header = format!("\n{} {}", "📍", card.title.bold());
        if let Some(rating) = &card.rating {
            header.push_str(&format!("  {} {}", "★".yellow(), rating));
        }
        if let Some(price_level) = &card.price_level {
            header.push_str(&format!("  {}", price_level.green()));
        }

        let mut lines = vec![header];
        if let Some(category) = &card.category {
            lines.push(format!("{}{}", INDENT, category.cyan()));
        }
        if let Some(description) = &card.description {
            lines.extend(
                wrap_text(description, self.width)
                    .into_iter()
                    .map(|l| format!("{}{}", INDENT, l.italic())),
            );
        }

        lines.push(self.lead_field("Telefone", card.phone_or_placeholder()));
        lines.push(self.lead_field("Site", card.website_or_placeholder()));
        lines.push(self.lead_field("Endereço", card.address_or_placeholder()));
        lines.push(self.lead_field("Avaliações", card.reviews_or_placeholder()));
        if let Some(hours) = &card.hours {
            lines.push(self.lead_field("Horário", hours));
        }
        if let Some(maps_url) = &card.maps_url {
            lines.push(self.lead_field("Maps", maps_url));
        }
        lines.join("\n")
    }

    fn lead_field(&self, label: &str, value: &str) -> String {
        let value = if value == NOT_AVAILABLE {
            value.dimmed().to_string()
        } else {
            value.to_string()
        };
        format!("{}{} {}", INDENT, format!("{}:", label).dimmed(), value)
    }

    pub fn format_step(&self, step: &StepView) -> String {
        let dot = match step.success {
            Some(true) => DOT.green().to_string(),
            Some(false) => DOT.red().to_string(),
            None => DOT.white().to_string(),
        };
        let mut line = format!(
            "{} #{} {} {}",
            dot,
            step.index,
            step.action.bold(),
            truncate_to_width(&step.current_url, self.width.saturating_sub(20)).dimmed()
        );
        if let Some(error) = &step.error {
            line.push_str(&format!("\n{}{}", INDENT, error.red()));
        }
        line
    }
}

/// Drop `**` / `__` emphasis markers from a paragraph line
fn strip_emphasis(line: &str) -> String {
    line.replace("**", "").replace("__", "")
}

/// History list formatter
pub struct HistoryFormatter;

impl HistoryFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format_row(&self, row: &HistoryRow) -> String {
        let kind = pad_to_width(row.kind, 9);
        let kind = if row.is_library {
            kind.magenta()
        } else {
            kind.blue()
        };
        let timestamp = row.timestamp.as_deref().unwrap_or("-");
        format!(
            "{} {} {} {} {} {}",
            status_dot(row.success),
            pad_to_width(&truncate_to_width(&row.target, TARGET_COLUMN), TARGET_COLUMN),
            kind,
            pad_to_width(&row.duration, 9),
            row.short_id.dimmed(),
            timestamp.dimmed()
        )
    }
}

/// Dashboard formatter
pub struct DashboardFormatter;

impl DashboardFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format(&self, stats: &DashboardStats) -> String {
        let mut lines = vec![
            format!("{} {}", "Total de execuções:".dimmed(), stats.total.to_string().bold()),
            format!("{} {}", "Taxa de sucesso:".dimmed(), stats.success_rate_label().bold()),
            format!("{} {}", "Tempo médio:".dimmed(), stats.avg_duration_label().bold()),
            section("Atividade recente"),
        ];

        if stats.recent.is_empty() {
            lines.push(format!("{}{}", INDENT, "Nenhuma execução registrada.".dimmed()));
        }
        for run in &stats.recent {
            lines.push(format!(
                "{} {} {} {}",
                status_dot(run.success),
                pad_to_width(&truncate_to_width(&run.url, TARGET_COLUMN), TARGET_COLUMN),
                run.source.dimmed(),
                run.timestamp.as_deref().unwrap_or("-").dimmed()
            ));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn plain(text: &str) -> String {
        console::strip_ansi_codes(text).into_owned()
    }

    #[test]
    fn test_failure_rendering_uses_placeholders() {
        let view = ResultView::from_value(&json!({}));
        let out = plain(&ResultFormatter::new(80).format(&view, false));
        assert!(out.contains("Status: Falha"));
        assert!(out.contains("Erro desconhecido"));
        assert!(out.contains("Tipo: unknown"));
        assert!(out.contains("Duração: -"));
        assert!(out.contains("Custo: $0.0000"));
        assert!(!out.contains("JSON Bruto"));
    }

    #[test]
    fn test_success_with_generic_cards() {
        let view = ResultView::from_value(&json!({
            "success": true,
            "metadata": {"duration_seconds": 2.5, "cost_usd": 0.1},
            "data": {
                "summary": "# Produtos\n- **Caneca** em promoção",
                "findings": [{"title": "Caneca", "url": "https://shop.example/1", "extra": {"preco": 19.9}}]
            }
        }));
        let out = plain(&ResultFormatter::new(80).format(&view, true));
        assert!(out.contains("Status: Sucesso"));
        assert!(out.contains("Duração: 2.50s"));
        assert!(out.contains("Custo: $0.1000"));
        assert!(out.contains("Resumo da IA"));
        assert!(out.contains("   Produtos"));
        assert!(out.contains("• **Caneca** em promoção"));
        assert!(out.contains("Itens (1)"));
        assert!(out.contains("[preco: 19.9]"));
        assert!(out.contains("JSON Bruto"));
        assert!(!out.contains("Leads:"));
    }

    #[test]
    fn test_lead_cards_show_placeholders() {
        let view = ResultView::from_value(&json!({
            "success": true,
            "metadata": {"source": "library:google_maps"},
            "data": {"findings": [{"title": "Padaria Real", "extra": {"phone": "11 5555-0000"}}]}
        }));
        let out = plain(&ResultFormatter::new(80).format(&view, false));
        assert!(out.contains("Leads: 1"));
        assert!(out.contains("Padaria Real"));
        assert!(out.contains("Telefone: 11 5555-0000"));
        assert!(out.contains("Site: Não disponível"));
        assert!(out.contains("Endereço: Não disponível"));
    }

    #[test]
    fn test_empty_findings_hint() {
        let view = ResultView::from_value(&json!({"success": true, "data": {"findings": []}}));
        let out = plain(&ResultFormatter::new(80).format(&view, false));
        assert!(out.contains("Nenhum item estruturado encontrado para exibir."));
    }

    #[test]
    fn test_history_row_columns() {
        let row = HistoryRow::build(&toolzz_core::result::HistoryRecord::new(json!({
            "id": "0123456789abcdef",
            "url": "https://openai.com",
            "payload": {"success": true, "metadata": {"duration_seconds": 1}}
        })));
        let out = plain(&HistoryFormatter::new().format_row(&row));
        assert!(out.contains("https://openai.com"));
        assert!(out.contains("Manual"));
        assert!(out.contains("1.00s"));
        assert!(out.contains("01234567"));
        assert!(!out.contains("89abcdef"));
    }

    #[test]
    fn test_dashboard_empty() {
        let out = plain(&DashboardFormatter::new().format(&DashboardStats::default()));
        assert!(out.contains("Total de execuções: 0"));
        assert!(out.contains("Taxa de sucesso: 0.0%"));
        assert!(out.contains("Nenhuma execução registrada."));
    }
}
