//! CLI integration tests for ora-export.
//!
//! These tests verify command-line argument parsing, help output and the
//! usage errors emitted before any database access is attempted.

use assert_cmd::Command;
use predicates::prelude::*;

/// Get a command for the ora-export binary.
fn cmd() -> Command {
    Command::cargo_bin("ora-export").unwrap()
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_shows_all_flags() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--schema"))
        .stdout(predicate::str::contains("--ddl"))
        .stdout(predicate::str::contains("--sync-dml"))
        .stdout(predicate::str::contains("--output-dir"))
        .stdout(predicate::str::contains("--output-json"));
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ora-export"));
}

// =============================================================================
// Usage Error Tests - no database access attempted
// =============================================================================

#[test]
fn test_missing_schema_prints_usage() {
    cmd()
        .args(["--sync-dml", "EMP"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--schema"));
}

#[test]
fn test_missing_mode_flag_prints_usage() {
    cmd()
        .args(["--schema", "APP", "EMP"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_empty_table_list_prints_usage() {
    cmd()
        .args(["--schema", "APP", "--ddl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_both_mode_flags_accepted() {
    // Both modes together is valid usage; the run then fails on the
    // missing config file, not on argument parsing.
    cmd()
        .args([
            "--schema",
            "APP",
            "--ddl",
            "--sync-dml",
            "--config",
            "does-not-exist.yaml",
            "EMP",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error").or(predicate::str::contains("error")));
}

// =============================================================================
// Configuration Error Tests
// =============================================================================

#[test]
fn test_missing_config_file_reports_io_error() {
    cmd()
        .args([
            "--schema",
            "APP",
            "--ddl",
            "--config",
            "no-such-config.yaml",
            "EMP",
        ])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn test_invalid_config_reports_yaml_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.yaml");
    std::fs::write(&config, "database: [not, a, mapping]").unwrap();

    cmd()
        .args(["--schema", "APP", "--ddl"])
        .arg("--config")
        .arg(&config)
        .arg("EMP")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("YAML"));
}
