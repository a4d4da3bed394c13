//! Implementation of the `brick-shell build` command.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;

use brick_shell_lib::build::{BuildReport, build};

use crate::output::{OutputFormat, format_duration, print_json, print_stat, print_success};

#[derive(Serialize)]
struct BuildSummary {
  #[serde(flatten)]
  report: BuildReport,
  elapsed_ms: u64,
}

/// Execute the build command.
///
/// Resolves the configuration, runs the pipeline once and prints a summary.
pub fn cmd_build(
  project_dir: &Path,
  out_dir: Option<PathBuf>,
  packages: Vec<String>,
  output: OutputFormat,
) -> Result<()> {
  let start = Instant::now();
  let inputs = super::load_inputs(project_dir, out_dir, packages)?;

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let report = rt.block_on(build(&inputs)).context("Build failed")?;
  let elapsed = start.elapsed();

  if output.is_json() {
    print_json(&BuildSummary {
      report,
      elapsed_ms: elapsed.as_millis() as u64,
    })?;
  } else {
    println!();
    print_success("Build complete!");
    print_stat("Output", &report.out_dir.display().to_string());
    print_stat("Bootstrap", &report.bootstrap_file);
    print_stat("Packages", &report.packages.len().to_string());
    print_stat("Storyboards", &report.storyboards.to_string());
    print_stat("Duration", &format_duration(elapsed));
  }

  Ok(())
}
