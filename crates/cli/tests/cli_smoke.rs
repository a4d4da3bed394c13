//! CLI smoke tests for brick-shell.
//!
//! These tests verify that all CLI commands run without panicking and
//! return appropriate exit codes.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a Command for the brick-shell binary with no inherited overrides.
fn brick_shell_cmd() -> Command {
  let mut cmd = cargo_bin_cmd!("brick-shell");
  cmd.env_remove("BRICK_SHELL_OUT_DIR");
  cmd.env_remove("BRICK_SHELL_PACKAGES");
  cmd.env_remove("RUST_LOG");
  cmd
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_works() {
  brick_shell_cmd()
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("Usage"));
}

#[test]
fn version_flag_works() {
  brick_shell_cmd()
    .arg("--version")
    .assert()
    .success()
    .stdout(predicate::str::contains("brick-shell"));
}

#[test]
fn subcommand_help_works() {
  for cmd in &["build", "info"] {
    brick_shell_cmd()
      .arg(cmd)
      .arg("--help")
      .assert()
      .success()
      .stdout(predicate::str::contains("Usage"));
  }
}

#[test]
fn unknown_subcommand_fails() {
  brick_shell_cmd().arg("deploy").assert().failure();
}

// =============================================================================
// info
// =============================================================================

#[test]
fn info_works_without_config_file() {
  let temp = TempDir::new().unwrap();

  brick_shell_cmd()
    .arg("info")
    .arg("--project-dir")
    .arg(temp.path())
    .assert()
    .success()
    .stdout(predicate::str::contains("basic, icons, illustrations, form, shoelace"));
}

#[test]
fn info_rejects_invalid_config() {
  let temp = TempDir::new().unwrap();
  std::fs::write(temp.path().join("brick-shell.toml"), "out_dir = [").unwrap();

  brick_shell_cmd()
    .arg("info")
    .arg("--project-dir")
    .arg(temp.path())
    .assert()
    .failure()
    .code(1)
    .stderr(predicate::str::contains("Failed to load build configuration"));
}

// =============================================================================
// build
// =============================================================================

#[test]
fn build_in_empty_project_fails() {
  let temp = TempDir::new().unwrap();

  brick_shell_cmd()
    .arg("build")
    .arg("--project-dir")
    .arg(temp.path())
    .assert()
    .failure()
    .code(1)
    .stderr(predicate::str::contains("Build failed"));
}
