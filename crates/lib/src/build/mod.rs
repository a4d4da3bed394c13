//! The bundle pipeline.
//!
//! One build runs in four phases:
//!
//! 1. reset the output directory
//! 2. concurrently copy the container distribution (then the static files on
//!    top of it), aggregate the brick packages and load the storyboards
//! 3. assemble, fingerprint and write the bootstrap manifest
//! 4. patch the entry document
//!
//! The first error aborts the build. Whatever was written so far stays on
//! disk until the next reset.

mod types;

use std::path::{Path, PathBuf};
use std::time::Instant;

use tokio::task::JoinSet;
use tracing::{debug, info};

pub use types::*;

use crate::aggregate::{ScopeResolver, aggregate_packages};
use crate::bootstrap::BootstrapManifest;
use crate::manifest::read_storyboards;
use crate::template::patch_entry_file;
use crate::workspace::{FilesystemError, Workspace, copy_file, copy_tree, exclude_subtrees};

/// Run the whole pipeline once.
pub async fn build(inputs: &BuildInputs) -> Result<BuildReport, BuildError> {
  let started = Instant::now();
  let workspace = Workspace::new(&inputs.out_dir);

  info!(out_dir = %inputs.out_dir.display(), "resetting output directory");
  workspace.reset().await?;

  let (_, brick_packages, storyboards) = tokio::try_join!(
    async { copy_container(inputs, &workspace).await.map_err(BuildError::from) },
    async {
      aggregate_packages(
        &inputs.brick_packages,
        &ScopeResolver::new(&inputs.packages_dir),
        &workspace,
      )
      .await
      .map_err(BuildError::from)
    },
    async { read_storyboards(&inputs.storyboards).await.map_err(BuildError::from) },
  )?;

  let storyboard_count = storyboards.len();
  let bootstrap = BootstrapManifest::assemble(brick_packages, storyboards).plan()?;
  bootstrap.write(workspace.root()).await?;

  patch_entry_file(&workspace.path(&inputs.entry_document), &bootstrap.file_name).await?;

  info!(
    bootstrap = %bootstrap.file_name,
    packages = inputs.brick_packages.len(),
    storyboards = storyboard_count,
    elapsed_ms = started.elapsed().as_millis() as u64,
    "build complete"
  );

  Ok(BuildReport {
    out_dir: inputs.out_dir.clone(),
    bootstrap_file: bootstrap.file_name,
    packages: inputs.brick_packages.clone(),
    storyboards: storyboard_count,
  })
}

/// Copy the container distribution into the output root, then the static
/// files, so a static file replaces a container file of the same name.
async fn copy_container(inputs: &BuildInputs, workspace: &Workspace) -> Result<(), FilesystemError> {
  let exclude = exclude_subtrees(&inputs.container_dir, &inputs.container_exclude);
  let stats = copy_tree(&inputs.container_dir, workspace.root(), Some(exclude)).await?;
  info!(files = stats.files, bytes = stats.bytes, "copied container distribution");

  let mut join_set = JoinSet::new();
  for source in &inputs.static_files {
    let source = source.clone();
    let destination = static_destination(workspace, &source)?;
    join_set.spawn(async move {
      let bytes = copy_file(&source, &destination).await?;
      debug!(file = %destination.display(), bytes, "copied static file");
      Ok::<_, FilesystemError>(())
    });
  }

  while let Some(joined) = join_set.join_next().await {
    joined.map_err(|e| FilesystemError::Task { message: e.to_string() })??;
  }
  Ok(())
}

fn static_destination(workspace: &Workspace, source: &Path) -> Result<PathBuf, FilesystemError> {
  source
    .file_name()
    .map(|name| workspace.path(name))
    .ok_or_else(|| FilesystemError::MissingSource {
      path: source.to_path_buf(),
    })
}
