//! CLI integration tests
//!
//! Every command runs in a scratch directory with its own XDG config home
//! and credentials file so no user configuration leaks in.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn toolzz(scratch: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("toolzz");
    cmd.current_dir(scratch)
        .env("XDG_CONFIG_HOME", scratch.join("xdg"))
        .env("TOOLZZ_CREDENTIALS_FILE", scratch.join("credentials.json"))
        .env_remove("TOOLZZ_API_BASE_URL")
        .env("NO_COLOR", "1");
    cmd
}

/// Base URL of a port nobody listens on
fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn write_json(dir: &Path, name: &str, value: serde_json::Value) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string_pretty(&value).unwrap()).unwrap();
    path
}

fn maps_result() -> serde_json::Value {
    json!({
        "success": true,
        "record_id": 12,
        "metadata": {"source": "library:google_maps", "duration_seconds": 41.2, "cost_usd": 0.0132},
        "data": {
            "summary": "## 2 empresas encontradas",
            "findings": [
                {"title": "Padaria Real", "extra": {"phone": "11 5555-0000", "website": "https://www.padariareal.com.br", "rating": 4.6}},
                {"extra": {"address": "Rua A, 10"}}
            ]
        }
    })
}

#[test]
fn help_lists_subcommands() {
    let scratch = TempDir::new().unwrap();
    toolzz(scratch.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("scrape"))
        .stdout(predicate::str::contains("history"))
        .stdout(predicate::str::contains("export"));
}

#[test]
fn show_renders_lead_cards() {
    let scratch = TempDir::new().unwrap();
    let file = write_json(scratch.path(), "maps.json", maps_result());

    toolzz(scratch.path())
        .arg("show")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Sucesso"))
        .stdout(predicate::str::contains("41.20s"))
        .stdout(predicate::str::contains("$0.0132"))
        .stdout(predicate::str::contains("Leads: 2"))
        .stdout(predicate::str::contains("Padaria Real"))
        .stdout(predicate::str::contains("padariareal.com.br"))
        .stdout(predicate::str::contains("Lead 2"))
        .stdout(predicate::str::contains("Não disponível"));
}

#[test]
fn show_json_prints_the_document_only() {
    let scratch = TempDir::new().unwrap();
    let file = write_json(scratch.path(), "maps.json", maps_result());

    let output = toolzz(scratch.path())
        .args(["show", "--json"])
        .arg(&file)
        .output()
        .unwrap();
    assert!(output.status.success());
    let printed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(printed, maps_result());
}

#[test]
fn show_failure_uses_placeholders() {
    let scratch = TempDir::new().unwrap();
    let file = write_json(scratch.path(), "empty.json", json!({}));

    toolzz(scratch.path())
        .arg("show")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Falha"))
        .stdout(predicate::str::contains("Erro desconhecido"))
        .stdout(predicate::str::contains("Tipo: unknown"));
}

#[test]
fn export_csv_writes_flattened_findings() {
    let scratch = TempDir::new().unwrap();
    let file = write_json(
        scratch.path(),
        "result.json",
        json!({"id": "run-1", "data": {"findings": [{"title": "A", "extra": {"phone": "1"}}, {"title": "B"}]}}),
    );

    toolzz(scratch.path())
        .args(["export", "--format", "csv", "--out-dir"])
        .arg(scratch.path())
        .arg(&file)
        .assert()
        .success()
        .stderr(predicate::str::contains("CSV baixado!"));

    let csv = fs::read_to_string(scratch.path().join("scrape_data_run-1.csv")).unwrap();
    assert_eq!(csv, "title,phone\n\"A\",\"1\"\n\"B\",\"\"");
}

#[test]
fn export_csv_without_findings_only_notifies() {
    let scratch = TempDir::new().unwrap();
    let out = scratch.path().join("out");
    fs::create_dir(&out).unwrap();
    let file = write_json(scratch.path(), "result.json", json!({"success": true, "id": 3}));

    toolzz(scratch.path())
        .args(["export", "-f", "csv", "-o"])
        .arg(&out)
        .arg(&file)
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Nenhum dado estruturado para exportar em CSV.",
        ));
    assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
}

#[test]
fn settings_round_trip() {
    let scratch = TempDir::new().unwrap();

    toolzz(scratch.path())
        .args(["settings", "set", "  sk-test-0123456789abcdef  "])
        .assert()
        .success()
        .stderr(predicate::str::contains("Chave de API salva com sucesso!"));

    let stored: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(scratch.path().join("credentials.json")).unwrap())
            .unwrap();
    assert_eq!(
        stored["entries"]["toolzz_openai_key"],
        "sk-test-0123456789abcdef"
    );

    toolzz(scratch.path())
        .args(["settings", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sk-...cdef"))
        .stdout(predicate::str::contains("0123456789").not());

    toolzz(scratch.path())
        .args(["settings", "clear"])
        .assert()
        .success();
    toolzz(scratch.path())
        .args(["settings", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("não configurada"));
}

#[test]
fn scrape_rejects_invalid_url_before_any_request() {
    let scratch = TempDir::new().unwrap();
    toolzz(scratch.path())
        .args(["scrape", "example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "URL inválida. Use o formato: https://example.com",
        ));
}

#[test]
fn scrape_against_unreachable_backend_renders_connection_failure() {
    let scratch = TempDir::new().unwrap();
    toolzz(scratch.path())
        .args(["--base-url", &unreachable_base_url()])
        .args(["scrape", "https://example.com", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Falha de conexão com API"))
        .stdout(predicate::str::contains("\"success\": false"));
}

#[test]
fn history_load_failure_shows_notification() {
    let scratch = TempDir::new().unwrap();
    toolzz(scratch.path())
        .args(["--base-url", &unreachable_base_url()])
        .args(["history", "--status", "error", "--domain", "openai.com"])
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Não foi possível carregar o histórico.",
        ))
        .stdout(predicate::str::contains("Nenhum registro encontrado."));
}

#[test]
fn health_reports_unreachable_backend() {
    let scratch = TempDir::new().unwrap();
    toolzz(scratch.path())
        .args(["--base-url", &unreachable_base_url(), "health"])
        .assert()
        .success()
        .stdout(predicate::str::contains("inacessível"));
}
