//! Integration tests for top-level CLI behavior.

use std::path::Path;
use std::process::{Command, Output};

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn mailtask(home: &Path, notion_url: Option<&str>, args: &[&str]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_mailtask"));
    cmd.args(args).env("MAILTASK_HOME", home).env_remove("RUST_LOG");
    match notion_url {
        Some(url) => cmd.env("MAILTASK_NOTION_URL", url),
        None => cmd.env_remove("MAILTASK_NOTION_URL"),
    };
    cmd
}

fn run_mailtask(home: &Path, args: &[&str]) -> Output {
    mailtask(home, None, args).output().expect("failed to run mailtask binary")
}

/// Runs the binary off the test runtime so the mock server keeps serving.
async fn run_against(server: &MockServer, home: &Path, args: &[&str]) -> Output {
    let mut cmd = mailtask(home, Some(&server.uri()), args);
    tokio::task::spawn_blocking(move || cmd.output())
        .await
        .expect("blocking task panicked")
        .expect("failed to run mailtask binary")
}

fn configure(home: &Path) {
    let output = run_mailtask(
        home,
        &[
            "config", "set", "--notion-token", "secret-token", "--planning-db", "db-planning",
            "--tasks-db", "db-tasks", "--systems-db", "db-systems", "--projects-db", "db-projects",
        ],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
}

#[test]
fn help_lists_subcommands() {
    let home = tempfile::tempdir().unwrap();
    let output = run_mailtask(home.path(), &["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    for command in ["config", "catalog", "projects", "create", "cache"] {
        assert!(stdout.contains(command), "missing {command} in help");
    }
}

#[test]
fn unknown_subcommand_fails() {
    let home = tempfile::tempdir().unwrap();
    let output = run_mailtask(home.path(), &["frobnicate"]);
    assert!(!output.status.success());
}

#[test]
fn config_show_masks_token() {
    let home = tempfile::tempdir().unwrap();
    configure(home.path());

    let output = run_mailtask(home.path(), &["config", "show"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("planning: db-planning"));
    assert!(stdout.contains("********"));
    assert!(!stdout.contains("secret-token"));
}

#[test]
fn settings_file_does_not_hold_plain_token() {
    let home = tempfile::tempdir().unwrap();
    configure(home.path());
    let raw = std::fs::read_to_string(home.path().join("settings.json")).unwrap();
    assert!(raw.starts_with("v1:"));
    assert!(!raw.contains("secret-token"));
}

#[test]
fn partial_config_reports_missing_settings() {
    let home = tempfile::tempdir().unwrap();
    let output = run_mailtask(home.path(), &["config", "set", "--planning-db", "db-planning"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("Still missing: notion token, tasks database, systems database"));
}

#[test]
fn catalog_without_config_fails_with_hint() {
    let home = tempfile::tempdir().unwrap();
    let output = run_mailtask(home.path(), &["catalog"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("mailtask config set"));
}

#[test]
fn config_clear_then_show_is_empty() {
    let home = tempfile::tempdir().unwrap();
    configure(home.path());
    assert!(run_mailtask(home.path(), &["config", "clear"]).status.success());

    let output = run_mailtask(home.path(), &["config", "show"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("db-planning"));
}

#[test]
fn cache_clear_succeeds_on_empty_home() {
    let home = tempfile::tempdir().unwrap();
    let output = run_mailtask(home.path(), &["cache", "clear"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Cache cleared."));
}

#[tokio::test]
async fn catalog_is_fetched_then_served_from_cache() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/databases/db-systems/query"))
        .and(header("Authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{
                "id": "sys-1",
                "properties": { "Sistema": { "title": [{ "plain_text": "CRM" }] } },
            }],
            "has_more": false,
            "next_cursor": null,
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/databases/db-planning"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "properties": {
                "Tipo": { "select": { "options": [{ "name": "Soporte" }] } },
                "Tema": { "select": { "options": [{ "name": "Billing" }] } },
            },
        })))
        .expect(2)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    configure(home.path());

    let first = run_against(&server, home.path(), &["catalog"]).await;
    let stdout = String::from_utf8_lossy(&first.stdout);
    assert!(first.status.success(), "{}", String::from_utf8_lossy(&first.stderr));
    assert!(stdout.contains("sys-1"));
    assert!(stdout.contains("Types: Soporte"));
    assert!(stdout.contains("Themes: Billing"));

    let second = run_against(&server, home.path(), &["catalog"]).await;
    assert!(second.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[tokio::test]
async fn create_project_task_writes_two_linked_records() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pages"))
        .and(body_partial_json(json!({ "parent": { "database_id": "db-planning" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "plan-1" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/pages"))
        .and(body_partial_json(json!({
            "parent": { "database_id": "db-tasks" },
            "properties": { "🏦 Planificación": { "relation": [{ "id": "plan-1" }] } },
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "task-1" })))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    configure(home.path());

    let output = run_against(
        &server,
        home.path(),
        &[
            "create", "--subject", "Invoice", "--sender", "ana@example.com", "--item-id", "AAMk",
            "--system", "sys-1", "--type", "Soporte", "--theme", "Billing", "--project-task",
        ],
    )
    .await;
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("Planning record: plan-1"));
    assert!(stdout.contains("task-1"));
    assert!(stdout.contains("Task created successfully"));
}

#[tokio::test]
async fn create_reports_remote_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pages"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "object": "error",
            "message": "Tipo is expected to be select.",
        })))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    configure(home.path());

    let output = run_against(
        &server,
        home.path(),
        &[
            "create", "--subject", "Invoice", "--sender", "ana@example.com", "--item-id", "AAMk",
            "--system", "sys-1", "--type", "Soporte", "--theme", "Billing",
        ],
    )
    .await;
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Tipo is expected to be select."));
}

#[tokio::test]
async fn config_check_reports_each_database() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "properties": {} })))
        .expect(3)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    configure(home.path());

    let output = run_against(&server, home.path(), &["config", "check"]).await;
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("planning  ok"));
    assert!(stdout.contains("systems   ok"));
}
