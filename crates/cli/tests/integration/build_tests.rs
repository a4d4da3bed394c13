//! Build command integration tests.

use predicates::prelude::*;
use serde_json::Value;

use super::common::{PACKAGES, TestEnv};

#[test]
fn build_default_project() {
  let env = TestEnv::project();

  env
    .brick_shell_cmd()
    .arg("build")
    .assert()
    .success()
    .stdout(predicate::str::contains("Build complete!"))
    .stdout(predicate::str::contains("Packages: 5"))
    .stdout(predicate::str::contains("Storyboards: 1"));

  let out = env.out_dir();
  assert!(out.join("index.html").is_file());
  assert!(out.join("conf.yaml").is_file());
  assert!(out.join("netlify.toml").is_file());
  assert!(!out.join("preview").exists());
  for name in PACKAGES {
    assert!(out.join("bricks").join(name).join("dist/bricks.json").is_file());
  }
  assert_eq!(env.bootstrap_files().len(), 1);
}

#[test]
fn build_json_output_names_bootstrap_file() {
  let env = TestEnv::project();

  let output = env
    .brick_shell_cmd()
    .args(["build", "--output", "json"])
    .assert()
    .success()
    .get_output()
    .stdout
    .clone();

  let summary: Value = serde_json::from_slice(&output).unwrap();
  let bootstrap_file = summary["bootstrap_file"].as_str().unwrap();
  assert_eq!(env.bootstrap_files(), vec![bootstrap_file.to_string()]);
  assert_eq!(summary["packages"].as_array().unwrap().len(), 5);
  assert_eq!(summary["storyboards"], 1);
  assert!(summary["elapsed_ms"].is_u64());

  let html = std::fs::read_to_string(env.out_dir().join("index.html")).unwrap();
  assert!(html.contains(&format!("window.BOOTSTRAP_FILE=\"{bootstrap_file}\"")));
}

#[test]
fn build_is_repeatable() {
  let env = TestEnv::project();

  env.brick_shell_cmd().arg("build").assert().success();
  let first = env.bootstrap_files();
  env.brick_shell_cmd().arg("build").assert().success();

  assert_eq!(env.bootstrap_files(), first);
}

#[test]
fn build_respects_package_flags() {
  let env = TestEnv::project();

  env
    .brick_shell_cmd()
    .args(["build", "--package", "icons", "--package", "basic"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Packages: 2"));

  let file = &env.bootstrap_files()[0];
  let bootstrap: Value = serde_json::from_slice(&std::fs::read(env.out_dir().join(file)).unwrap()).unwrap();
  assert_eq!(
    bootstrap["brickPackages"],
    serde_json::json!([{"id": "icons"}, {"id": "basic"}])
  );
  assert!(!env.out_dir().join("bricks/form").exists());
}

#[test]
fn build_respects_out_dir_flag() {
  let env = TestEnv::project();

  env
    .brick_shell_cmd()
    .args(["build", "--out-dir", "public"])
    .assert()
    .success();

  assert!(env.project_dir().join("public/index.html").is_file());
  assert!(!env.out_dir().exists());
}

#[test]
fn build_respects_env_packages() {
  let env = TestEnv::project();

  env
    .brick_shell_cmd()
    .arg("build")
    .env("BRICK_SHELL_PACKAGES", "shoelace")
    .assert()
    .success()
    .stdout(predicate::str::contains("Packages: 1"));
}

#[test]
fn build_uses_config_file() {
  let env = TestEnv::project();
  env.write_file("brick-shell.toml", "out_dir = \"site\"\nbrick_packages = [\"form\"]\n");

  env.brick_shell_cmd().arg("build").assert().success();

  assert!(env.project_dir().join("site/bricks/form/dist/bricks.json").is_file());
}

#[test]
fn build_with_missing_manifest_fails() {
  let env = TestEnv::project();
  std::fs::remove_file(env.project_dir().join("node_modules/@next-bricks/form/dist/bricks.json")).unwrap();

  env
    .brick_shell_cmd()
    .arg("build")
    .assert()
    .failure()
    .code(1)
    .stderr(predicate::str::contains("Build failed"))
    .stderr(predicate::str::contains("package 'form'"));

  assert!(env.bootstrap_files().is_empty());
}

#[test]
fn build_with_unterminated_head_fails() {
  let env = TestEnv::project();
  env.write_file(
    "node_modules/@next-core/brick-container/dist/index.html",
    "<html><body></body></html>",
  );

  env
    .brick_shell_cmd()
    .arg("build")
    .assert()
    .failure()
    .stderr(predicate::str::contains("</head>"));
}

#[test]
fn build_refuses_out_dir_over_project() {
  let env = TestEnv::project();

  env
    .brick_shell_cmd()
    .args(["build", "--out-dir", "."])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Invalid build configuration"));

  assert!(env.project_dir().join("netlify.toml").is_file());
}

#[test]
fn verbose_build_logs_to_stderr() {
  let env = TestEnv::project();

  env
    .brick_shell_cmd()
    .args(["-v", "build"])
    .assert()
    .success()
    .stderr(predicate::str::contains("build complete"));
}
