use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn logp(home: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_logp"));
    command.arg("--path.home").arg(home);
    command
}

fn write_config(dir: &Path, json: &str) -> std::path::PathBuf {
    let path = dir.join("agent.json");
    fs::write(&path, json).expect("write config");
    path
}

#[test]
fn help_lists_usage() {
    Command::new(env!("CARGO_BIN_EXE_logp"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stderr(predicate::str::is_empty());
}

#[test]
fn unknown_flag_is_rejected() {
    let home = tempfile::tempdir().expect("tempdir");
    logp(home.path())
        .arg("--definitely-not-a-flag")
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("--definitely-not-a-flag"));
}

#[test]
fn forced_console_logs_messages_to_stderr() {
    let home = tempfile::tempdir().expect("tempdir");
    logp(home.path())
        .args(["-e", "hello", "world"])
        .assert()
        .success()
        .stderr(predicate::str::contains("INFO\tmain\thello\nINFO\tmain\tworld\n"));

    assert!(!home.path().join("logs").exists());
}

#[test]
fn debug_selectors_enable_config_category() {
    let home = tempfile::tempdir().expect("tempdir");
    let config = write_config(home.path(), r#"{"logging": {"level": "error"}}"#);
    logp(home.path())
        .args(["-e", "-d", "config", "-c"])
        .arg(&config)
        .assert()
        .success()
        .stderr(predicate::str::contains("DBG\tconfig\tloading configuration from"))
        .stderr(predicate::str::contains("DBG\tconfig\teffective level debug"));
}

#[test]
fn default_run_writes_to_log_directory() {
    let home = tempfile::tempdir().expect("tempdir");
    let config = write_config(
        home.path(),
        r#"{"logging": {"files": {"rotation": "never"}}}"#,
    );
    logp(home.path())
        .args(["--name", "agent", "-c"])
        .arg(&config)
        .arg("started")
        .assert()
        .success()
        .stderr(predicate::str::is_empty());

    let written = fs::read_to_string(home.path().join("logs").join("agent")).expect("read log");
    assert_eq!(written, "INFO\tmain\tstarted\n");
}

#[test]
fn json_lines_in_log_file() {
    let home = tempfile::tempdir().expect("tempdir");
    let config = write_config(
        home.path(),
        r#"{"logging": {"json": true, "files": {"rotation": "never", "name": "events"}}}"#,
    );
    logp(home.path())
        .arg("-c")
        .arg(&config)
        .arg("ready")
        .assert()
        .success();

    let written = fs::read_to_string(home.path().join("logs").join("events")).expect("read log");
    let value: serde_json::Value = serde_json::from_str(written.trim_end()).expect("json line");
    assert_eq!(value["level"], "info");
    assert_eq!(value["category"], "main");
    assert_eq!(value["message"], "ready");
}

#[test]
fn logs_override_moves_files() {
    let home = tempfile::tempdir().expect("tempdir");
    let logs = home.path().join("elsewhere");
    let config = write_config(
        home.path(),
        r#"{"logging": {"files": {"rotation": "never"}}}"#,
    );
    logp(home.path())
        .args(["--name", "agent", "-c"])
        .arg(&config)
        .arg("--path.logs")
        .arg(&logs)
        .arg("moved")
        .assert()
        .success();

    assert!(logs.join("agent").is_file());
    assert!(!home.path().join("logs").exists());
}

#[test]
fn print_policy_reports_effective_values() {
    let home = tempfile::tempdir().expect("tempdir");
    let output = logp(home.path())
        .args(["-e", "-d", "auth,net", "--print-policy"])
        .output()
        .expect("run logp");
    assert!(output.status.success());

    let policy: serde_json::Value = serde_json::from_slice(&output.stdout).expect("policy json");
    assert_eq!(policy["severity"], "debug");
    assert_eq!(policy["selectors"]["enabled"], serde_json::json!(["auth", "net"]));
    assert_eq!(policy["to_console"], true);
    assert_eq!(policy["to_files"], false);
    assert_eq!(policy["to_syslog"], false);
}

#[test]
fn print_policy_fills_file_defaults() {
    let home = tempfile::tempdir().expect("tempdir");
    let output = logp(home.path())
        .args(["--name", "agent", "--print-policy"])
        .output()
        .expect("run logp");
    assert!(output.status.success());

    let policy: serde_json::Value = serde_json::from_slice(&output.stdout).expect("policy json");
    assert_eq!(policy["to_files"], true);
    assert_eq!(policy["to_console"], false);
    assert_eq!(policy["files"]["name"], "agent");
    assert_eq!(
        policy["files"]["path"],
        &*home.path().join("logs").to_string_lossy()
    );
}

#[test]
fn unknown_level_fails_with_message() {
    let home = tempfile::tempdir().expect("tempdir");
    let config = write_config(home.path(), r#"{"logging": {"level": "loud"}}"#);
    logp(home.path())
        .args(["-e", "-c"])
        .arg(&config)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown log level: loud"));
}

#[test]
fn missing_config_fails_with_path() {
    let home = tempfile::tempdir().expect("tempdir");
    logp(home.path())
        .args(["-e", "-c"])
        .arg(home.path().join("missing.json"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to read config"))
        .stderr(predicate::str::contains("missing.json"));
}

#[test]
fn malformed_config_fails() {
    let home = tempfile::tempdir().expect("tempdir");
    let config = write_config(home.path(), r#"{"logging": {"to_files": "yes"}}"#);
    logp(home.path())
        .args(["-e", "-c"])
        .arg(&config)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid config"));
}

#[test]
fn unwritable_log_directory_fails() {
    let home = tempfile::tempdir().expect("tempdir");
    fs::write(home.path().join("logs"), b"file").expect("create blocker");
    logp(home.path())
        .arg("hello")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to activate file sink"));
}
