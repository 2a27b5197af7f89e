//! CLI smoke tests for the taskdeck binary.
//!
//! These only exercise flows that never reach a live server: help/version
//! output, configuration handling, and the offline session commands. The
//! temp config points the API at a closed port so an accidental network
//! call fails fast instead of hanging.

use std::fs;
use std::process::{Command, Stdio};
use tempfile::TempDir;

fn run_taskdeck(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_taskdeck"))
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute taskdeck")
}

/// Write a config whose home dir lives under the temp dir and whose API
/// endpoint is unreachable.
fn write_test_config(dir: &TempDir) -> String {
    let home = dir.path().join("home");
    let config_path = dir.path().join("config.yaml");
    let yaml = format!(
        r#"home_dir: "{}"
api:
  base_url: "http://127.0.0.1:1"
  timeout_sec: 1
"#,
        home.display()
    );
    fs::write(&config_path, yaml).unwrap();
    config_path.to_string_lossy().to_string()
}

#[test]
fn test_cli_help_command() {
    let output = run_taskdeck(&["--help"]);

    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("taskdeck"), "Should contain binary name");
    assert!(
        stdout.contains("Usage:") || stdout.contains("USAGE:"),
        "Should contain usage information"
    );
    assert!(stdout.contains("login"), "Should contain 'login' subcommand");
    assert!(stdout.contains("task"), "Should contain 'task' subcommand");
    assert!(stdout.contains("check"), "Should contain 'check' subcommand");
    assert!(stdout.contains("--config"), "Should mention config option");
}

#[test]
fn test_cli_version_command() {
    let output = run_taskdeck(&["--version"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("0.1.0"));
}

#[test]
fn test_check_command_reports_configuration() {
    let dir = TempDir::new().unwrap();
    let config = write_test_config(&dir);

    let output = run_taskdeck(&["--config", &config, "check"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Configuration check passed"));
    assert!(stdout.contains("http://127.0.0.1:1"));
}

#[test]
fn test_print_config_flag() {
    let dir = TempDir::new().unwrap();
    let config = write_test_config(&dir);

    let output = run_taskdeck(&["--config", &config, "--print-config", "whoami"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("base_url"));
    assert!(stdout.contains("current_user.json"));
}

#[test]
fn test_whoami_without_session() {
    let dir = TempDir::new().unwrap();
    let config = write_test_config(&dir);

    let output = run_taskdeck(&["--config", &config, "whoami"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Not logged in."));
}

#[test]
fn test_task_commands_require_a_session() {
    let dir = TempDir::new().unwrap();
    let config = write_test_config(&dir);

    let output = run_taskdeck(&["--config", &config, "task", "stats"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Not logged in"));
}

#[test]
fn test_login_rejects_invalid_email_before_any_network_call() {
    let dir = TempDir::new().unwrap();
    let config = write_test_config(&dir);

    let output = run_taskdeck(&["--config", &config, "login", "not-an-email"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("valid email"));
}

#[test]
fn test_logout_without_session_still_succeeds() {
    let dir = TempDir::new().unwrap();
    let config = write_test_config(&dir);

    let output = run_taskdeck(&["--config", &config, "logout"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Logged out."));
}
