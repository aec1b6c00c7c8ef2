//! CSV flattening of a result's findings
//!
//! Header: union of normalized field keys in first-seen order, unquoted.
//! Rows: every cell double-quoted with `"` doubled; missing cells empty.
//! Lines are joined by `\n` with no trailing newline.

use crate::error::ExportError;
use crate::result::value::display_or_empty;
use crate::result::{NormalizedFinding, ScrapeResult};

/// Union of all field keys, in the order they are first seen
pub fn collect_headers(findings: &[NormalizedFinding]) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    for finding in findings {
        for key in finding.fields.keys() {
            if !headers.iter().any(|h| h == key) {
                headers.push(key.clone());
            }
        }
    }
    headers
}

fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

/// Render normalized findings as CSV text
pub fn findings_to_csv(findings: &[NormalizedFinding]) -> Result<String, ExportError> {
    if findings.is_empty() {
        return Err(ExportError::NoFindings);
    }

    let headers = collect_headers(findings);
    let mut lines = Vec::with_capacity(findings.len() + 1);
    lines.push(headers.join(","));

    for finding in findings {
        let row: Vec<String> = headers
            .iter()
            .map(|header| quote(&display_or_empty(finding.fields.get(header))))
            .collect();
        lines.push(row.join(","));
    }

    Ok(lines.join("\n"))
}

/// Render a whole result's findings as CSV text
pub fn result_to_csv(result: &ScrapeResult) -> Result<String, ExportError> {
    findings_to_csv(&NormalizedFinding::normalize_all(result.findings()))
}
