use std::path::Path;

use anyhow::Result;

use crate::output::{OutputFormat, print_info, print_json, print_stat};

pub fn cmd_info(project_dir: &Path, output: OutputFormat) -> Result<()> {
  let inputs = super::load_inputs(project_dir, None, Vec::new())?;

  if output.is_json() {
    return print_json(&inputs);
  }

  print_info("Build configuration:");
  print_stat("Project", &inputs.project_dir.display().to_string());
  print_stat("Output", &inputs.out_dir.display().to_string());
  print_stat("Container", &inputs.container_dir.display().to_string());
  print_stat("Excluded", &inputs.container_exclude.join(", "));
  print_stat("Packages dir", &inputs.packages_dir.display().to_string());
  print_stat("Packages", &inputs.brick_packages.join(", "));
  print_stat("Storyboards", &inputs.storyboards.display().to_string());
  for file in &inputs.static_files {
    print_stat("Static file", &file.display().to_string());
  }
  print_stat("Entry document", &inputs.entry_document);

  Ok(())
}
