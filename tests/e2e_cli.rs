//! End-to-end tests for the `doubanq` binary.
//!
//! These avoid the network: an unknown category short-circuits before any
//! request, and usage errors fail during argument parsing.

use serde_json::Value;
use std::process::{Command, Output};

fn run(args: &[&str], config_dir: &std::path::Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_doubanq"))
        .args(args)
        .env("DOUBANQ_CONFIG_DIR", config_dir)
        .env("DOUBANQ_CACHE_DIR", config_dir.join("cache"))
        .env_remove("DOUBANQ_CONFIG")
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run doubanq")
}

#[test]
fn unknown_category_prints_empty_items() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = run(&["xyz", "anything"], dir.path());

    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(json, serde_json::json!({ "items": [] }));
}

#[test]
fn missing_query_is_usage_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = run(&["movie"], dir.path());

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn invalid_config_file_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("bad.toml");
    std::fs::write(&config, "timeout_seconds = 0").expect("write config");

    let output = run(
        &["--config", config.to_str().expect("utf-8 path"), "xyz", "q"],
        dir.path(),
    );
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn logs_stay_off_stdout() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = Command::new(env!("CARGO_BIN_EXE_doubanq"))
        .args(["xyz", "q"])
        .env("DOUBANQ_CONFIG_DIR", dir.path())
        .env("DOUBANQ_CACHE_DIR", dir.path().join("cache"))
        .env("RUST_LOG", "debug")
        .output()
        .expect("failed to run doubanq");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf-8");
    assert_eq!(stdout.trim(), r#"{"items":[]}"#);
}
