//! Build configuration.
//!
//! Settings are read from an optional `brick-shell.toml` in the project
//! directory. Every key has a default matching the conventional project
//! layout, so most projects need no file at all:
//!
//! ```toml
//! out_dir = "build"
//! container_dir = "node_modules/@next-core/brick-container/dist"
//! exclude = ["preview"]
//! packages_dir = "node_modules/@next-bricks"
//! brick_packages = ["basic", "icons", "illustrations", "form", "shoelace"]
//! storyboards = "src/storyboards.yaml"
//! static_files = ["src/conf.yaml", "netlify.toml"]
//! entry_document = "index.html"
//! ```
//!
//! `BRICK_SHELL_OUT_DIR` and `BRICK_SHELL_PACKAGES` override the file.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::build::BuildInputs;
use crate::consts::{BRICKS_DIR, CONFIG_FILENAME, ENV_OUT_DIR, ENV_PACKAGES};
use crate::util::path::resolve_against;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config {}: {source}", path.display())]
  Read { path: PathBuf, source: io::Error },

  #[error("invalid config {}: {source}", path.display())]
  Parse { path: PathBuf, source: toml::de::Error },

  #[error("no brick packages configured")]
  NoPackages,

  #[error("invalid package name '{0}': must be a single path segment")]
  InvalidPackageName(String),

  #[error("package '{0}' is listed more than once")]
  DuplicatePackage(String),

  #[error("static file {} has no file name", .0.display())]
  InvalidStaticFile(PathBuf),

  #[error("static files collide on output name '{0}'")]
  StaticFileCollision(String),

  #[error("output directory {} overlaps input {}", out_dir.display(), input.display())]
  UnsafeOutDir { out_dir: PathBuf, input: PathBuf },
}

/// User-facing build settings. Relative paths are relative to the project directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
  /// Output directory, recreated on every build.
  pub out_dir: PathBuf,
  /// Container distribution copied into the output root.
  pub container_dir: PathBuf,
  /// Top-level entries of the container distribution to leave out.
  pub exclude: Vec<String>,
  /// Directory holding one subdirectory per brick package.
  pub packages_dir: PathBuf,
  /// Packages to bundle, in bootstrap order.
  pub brick_packages: Vec<String>,
  /// Storyboard YAML file.
  pub storyboards: PathBuf,
  /// Files copied verbatim into the output root under their base name.
  pub static_files: Vec<PathBuf>,
  /// Entry document inside the container distribution.
  pub entry_document: String,
}

impl Default for BuildConfig {
  fn default() -> Self {
    Self {
      out_dir: PathBuf::from("build"),
      container_dir: PathBuf::from("node_modules/@next-core/brick-container/dist"),
      exclude: vec!["preview".to_string()],
      packages_dir: PathBuf::from("node_modules/@next-bricks"),
      brick_packages: ["basic", "icons", "illustrations", "form", "shoelace"]
        .into_iter()
        .map(String::from)
        .collect(),
      storyboards: PathBuf::from("src/storyboards.yaml"),
      static_files: vec![PathBuf::from("src/conf.yaml"), PathBuf::from("netlify.toml")],
      entry_document: "index.html".to_string(),
    }
  }
}

impl BuildConfig {
  /// Load `brick-shell.toml` from `project_dir`, or defaults if there is none.
  pub fn load(project_dir: &Path) -> Result<Self, ConfigError> {
    let path = project_dir.join(CONFIG_FILENAME);
    if !path.exists() {
      debug!(path = %path.display(), "no config file, using defaults");
      return Ok(Self::default());
    }

    let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
      path: path.clone(),
      source,
    })?;
    Self::from_toml_str(&content, &path)
  }

  /// Parse TOML settings. `path` is only used for error reporting.
  pub fn from_toml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
    toml::from_str(content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Apply `BRICK_SHELL_*` environment overrides.
  pub fn with_env_overrides(mut self) -> Self {
    match std::env::var(ENV_OUT_DIR) {
      Ok(out_dir) if !out_dir.is_empty() => self.out_dir = PathBuf::from(out_dir),
      _ => {}
    }

    if let Ok(packages) = std::env::var(ENV_PACKAGES) {
      let packages: Vec<String> = packages
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect();
      if !packages.is_empty() {
        self.brick_packages = packages;
      }
    }

    self
  }

  /// Validate settings and resolve every path against `project_dir`.
  pub fn resolve(&self, project_dir: &Path) -> Result<BuildInputs, ConfigError> {
    if self.brick_packages.is_empty() {
      return Err(ConfigError::NoPackages);
    }
    let mut seen = HashSet::new();
    for name in &self.brick_packages {
      if !is_single_segment(name) {
        return Err(ConfigError::InvalidPackageName(name.clone()));
      }
      if !seen.insert(name.as_str()) {
        return Err(ConfigError::DuplicatePackage(name.clone()));
      }
    }

    let mut output_names = HashSet::from([BRICKS_DIR.to_string(), self.entry_document.clone()]);
    for file in &self.static_files {
      let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| ConfigError::InvalidStaticFile(file.clone()))?;
      if !output_names.insert(name.clone()) {
        return Err(ConfigError::StaticFileCollision(name));
      }
    }

    let project_dir = resolve_against(&std::env::current_dir().unwrap_or_default(), project_dir);
    let resolve = |path: &Path| resolve_against(&project_dir, path);

    let inputs = BuildInputs {
      out_dir: resolve(&self.out_dir),
      container_dir: resolve(&self.container_dir),
      container_exclude: self.exclude.clone(),
      packages_dir: resolve(&self.packages_dir),
      brick_packages: self.brick_packages.clone(),
      storyboards: resolve(&self.storyboards),
      static_files: self.static_files.iter().map(|p| resolve(p)).collect(),
      entry_document: self.entry_document.clone(),
      project_dir,
    };

    // Resetting the output must never delete the project or an input.
    let guarded = [
      &inputs.project_dir,
      &inputs.container_dir,
      &inputs.packages_dir,
      &inputs.storyboards,
    ];
    for input in guarded.into_iter().chain(inputs.static_files.iter()) {
      if input.starts_with(&inputs.out_dir) {
        return Err(inputs.unsafe_out_dir(input));
      }
    }

    // Copied trees must not contain the output, or the output is copied into itself.
    if inputs.out_dir.starts_with(&inputs.container_dir) {
      return Err(inputs.unsafe_out_dir(&inputs.container_dir));
    }
    for name in &inputs.brick_packages {
      let package_dir = inputs.packages_dir.join(name);
      if inputs.out_dir.starts_with(&package_dir) {
        return Err(inputs.unsafe_out_dir(&package_dir));
      }
    }

    Ok(inputs)
  }
}

impl BuildInputs {
  fn unsafe_out_dir(&self, input: &Path) -> ConfigError {
    ConfigError::UnsafeOutDir {
      out_dir: self.out_dir.clone(),
      input: input.to_path_buf(),
    }
  }
}

fn is_single_segment(name: &str) -> bool {
  !name.trim().is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}
