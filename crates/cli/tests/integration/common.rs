//! Shared test helpers for CLI integration tests.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

pub const PACKAGES: &[&str] = &["basic", "icons", "illustrations", "form", "shoelace"];

const ENTRY_HTML: &str = r#"<!doctype html>
<html>
<head>
<base href="<!--# echo var='base_href' default='/' -->">
<script>window.CORE_ROOT="<!--# echo var='core_root' default='' -->";window.MOCK_DATE="<!--# echo var='mock_date' default='' -->";window.PUBLIC_CDN="<!--# echo var='public_cdn' default='' -->";</script>
</head>
<body></body>
</html>
"#;

const STORYBOARDS: &str = r#"
- app:
    id: hello
    homepage: /hello
  routes:
    - path: ${APP.homepage}
"#;

/// Isolated test environment.
///
/// Each test gets its own temporary project directory.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  /// Create an empty project directory.
  pub fn empty() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  /// Create a project laid out the conventional way, with every default
  /// package installed.
  pub fn project() -> Self {
    let env = Self::empty();
    let container = "node_modules/@next-core/brick-container/dist";
    env.write_file(&format!("{container}/index.html"), ENTRY_HTML);
    env.write_file(&format!("{container}/core/main.js"), "/* core */");
    env.write_file(&format!("{container}/preview/index.html"), "<html></html>");
    for name in PACKAGES {
      env.write_file(
        &format!("node_modules/@next-bricks/{name}/dist/bricks.json"),
        &format!(r#"{{"id":"{name}"}}"#),
      );
    }
    env.write_file("src/storyboards.yaml", STORYBOARDS);
    env.write_file("src/conf.yaml", "sys_settings: {}\n");
    env.write_file("netlify.toml", "[build]\n");
    env
  }

  /// Write a file relative to the project directory.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  /// Project directory, canonicalized.
  pub fn project_dir(&self) -> PathBuf {
    let p = self.temp.path().to_path_buf();
    dunce::canonicalize(&p).unwrap_or(p)
  }

  /// Default output directory.
  pub fn out_dir(&self) -> PathBuf {
    self.project_dir().join("build")
  }

  /// Get a pre-configured Command for the brick-shell binary.
  ///
  /// Clears `BRICK_SHELL_*` overrides and runs from the project directory,
  /// so the default `--project-dir` resolves to it.
  pub fn brick_shell_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("brick-shell");
    cmd.env_remove("BRICK_SHELL_OUT_DIR");
    cmd.env_remove("BRICK_SHELL_PACKAGES");
    cmd.env_remove("RUST_LOG");
    cmd.current_dir(self.project_dir());
    cmd
  }

  /// Names of `bootstrap.*.json` files in the output directory.
  pub fn bootstrap_files(&self) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(self.out_dir()) else {
      return Vec::new();
    };
    let mut names: Vec<String> = entries
      .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
      .filter(|n| n.starts_with("bootstrap.") && n.ends_with(".json"))
      .collect();
    names.sort();
    names
  }
}
