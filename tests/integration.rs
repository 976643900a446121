//! Integration tests for the rulecast binary.
//!
//! None of these touch the network: `update` is only exercised on
//! configurations that fail before fetching.

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Run rulecast with the given arguments
fn run_rulecast(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_rulecast"))
        .args(args)
        .output()
        .expect("Failed to execute rulecast")
}

fn config_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[test]
fn test_version_command() {
    let output = run_rulecast(&["version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("rulecast"));
}

#[test]
fn test_help_command() {
    let output = run_rulecast(&["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("update"));
    assert!(stdout.contains("check"));
}

#[test]
fn test_check_command_renders_dialects() {
    let output = run_rulecast(&["check", "DOMAIN-SUFFIX,example.com", "--policy", "Reject"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("HOST-SUFFIX, example.com, Reject"));
    assert!(stdout.contains("DOMAIN-SUFFIX,example.com"));
    assert!(stdout.contains("+.example.com"));
}

#[test]
fn test_check_command_rejected_line() {
    let output = run_rulecast(&["check", "@@||example.com^"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("REJECTED"));
}

#[test]
fn test_init_then_validate_and_list() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_arg(&temp_dir.path().join("rulecast.yaml"));

    let output = run_rulecast(&["--config", &config, "init"]);
    assert!(output.status.success());

    // A second init without --force must refuse
    let output = run_rulecast(&["--config", &config, "init"]);
    assert!(!output.status.success());

    let output = run_rulecast(&["--config", &config, "validate"]);
    assert!(output.status.success());

    let output = run_rulecast(&["--config", &config, "tasks", "--json"]);
    assert!(output.status.success());
    let tasks: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(tasks.as_array().is_some_and(|t| !t.is_empty()));
}

#[test]
fn test_validate_rejects_bad_config() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("rulecast.yaml");
    std::fs::write(
        &path,
        "tasks:\n  - {name: ads, policy: Reject, type: domain, url: https://x.org/a}\n",
    )
    .unwrap();

    let output = run_rulecast(&["--config", &config_arg(&path), "validate"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("strict"));
}

#[test]
fn test_update_unknown_task_fails_before_fetching() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("rulecast.yaml");
    std::fs::write(
        &path,
        format!(
            "output_dir: {}\ntasks:\n  - {{name: lan, policy: P, type: ip, url: https://x.org/a}}\n",
            temp_dir.path().join("rules").display()
        ),
    )
    .unwrap();

    let output = run_rulecast(&["--config", &config_arg(&path), "update", "--task", "nope"]);
    assert!(!output.status.success());
    assert!(!temp_dir.path().join("rules").exists());
}

#[test]
fn test_missing_config_fails() {
    let output = run_rulecast(&["--config", "/nonexistent/rulecast.yaml", "tasks"]);
    assert!(!output.status.success());
}
