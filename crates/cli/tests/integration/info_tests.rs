//! Info command integration tests.

use predicates::prelude::*;
use serde_json::Value;

use super::common::TestEnv;

#[test]
fn info_reports_resolved_paths() {
  let env = TestEnv::empty();

  let output = env
    .brick_shell_cmd()
    .args(["info", "--output", "json"])
    .assert()
    .success()
    .get_output()
    .stdout
    .clone();

  let inputs: Value = serde_json::from_slice(&output).unwrap();
  let out_dir = env.out_dir();
  assert_eq!(inputs["out_dir"], out_dir.to_string_lossy().as_ref());
  assert_eq!(inputs["entry_document"], "index.html");
  assert_eq!(inputs["brick_packages"].as_array().unwrap().len(), 5);
}

#[test]
fn info_does_not_create_output() {
  let env = TestEnv::empty();

  env.brick_shell_cmd().arg("info").assert().success();

  assert!(!env.out_dir().exists());
}

#[test]
fn info_reflects_env_overrides() {
  let env = TestEnv::empty();

  env
    .brick_shell_cmd()
    .arg("info")
    .env("BRICK_SHELL_PACKAGES", "basic,form")
    .assert()
    .success()
    .stdout(predicate::str::contains("Packages: basic, form"));
}

#[test]
fn info_rejects_unknown_config_keys() {
  let env = TestEnv::empty();
  env.write_file("brick-shell.toml", "packages = [\"basic\"]\n");

  env
    .brick_shell_cmd()
    .arg("info")
    .assert()
    .failure()
    .stderr(predicate::str::contains("invalid config"));
}

#[test]
fn verbose_info_logs_resolved_inputs() {
  let env = TestEnv::empty();

  env
    .brick_shell_cmd()
    .args(["-v", "info"])
    .assert()
    .success()
    .stderr(predicate::str::contains("resolved build inputs"));
}
