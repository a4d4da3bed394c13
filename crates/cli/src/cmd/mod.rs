mod build;
mod info;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use brick_shell_lib::build::BuildInputs;
use brick_shell_lib::config::BuildConfig;

pub use build::cmd_build;
pub use info::cmd_info;

/// Load settings for `project_dir`, layering env overrides and then flags.
fn load_inputs(project_dir: &Path, out_dir: Option<PathBuf>, packages: Vec<String>) -> Result<BuildInputs> {
  let mut config = BuildConfig::load(project_dir)
    .context("Failed to load build configuration")?
    .with_env_overrides();

  if let Some(out_dir) = out_dir {
    config.out_dir = out_dir;
  }
  if !packages.is_empty() {
    config.brick_packages = packages;
  }

  let inputs = config.resolve(project_dir).context("Invalid build configuration")?;
  debug!(
    project_dir = %inputs.project_dir.display(),
    out_dir = %inputs.out_dir.display(),
    packages = ?inputs.brick_packages,
    "resolved build inputs"
  );
  Ok(inputs)
}
