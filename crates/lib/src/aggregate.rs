//! Brick package aggregation.
//!
//! Each declared package is handled by its own task: its manifest is loaded
//! and its distribution directory is copied to `bricks/<name>/` in the output
//! tree. Tasks finish in any order; results are put back in declaration
//! order before returning.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::consts::BRICKS_DIR;
use crate::manifest::{ManifestError, read_package_manifest};
use crate::workspace::{FilesystemError, Workspace, copy_tree};

/// Errors aggregating brick packages. The first failing package aborts the rest.
#[derive(Debug, Error)]
pub enum PackageError {
  #[error("package '{name}': {source}")]
  Manifest { name: String, source: ManifestError },

  #[error("package '{name}': {source}")]
  Copy { name: String, source: FilesystemError },

  #[error("package '{name}' is declared more than once")]
  Duplicate { name: String },

  #[error("package task failed: {message}")]
  Task { message: String },
}

/// Maps a package name to its distribution directory.
pub trait PackageResolver: Send + Sync {
  fn resolve(&self, name: &str) -> PathBuf;
}

impl<F> PackageResolver for F
where
  F: Fn(&str) -> PathBuf + Send + Sync,
{
  fn resolve(&self, name: &str) -> PathBuf {
    self(name)
  }
}

/// Resolves packages as subdirectories of a scope directory,
/// e.g. `node_modules/@next-bricks/<name>`.
#[derive(Debug, Clone)]
pub struct ScopeResolver {
  scope_dir: PathBuf,
}

impl ScopeResolver {
  pub fn new(scope_dir: impl Into<PathBuf>) -> Self {
    Self {
      scope_dir: scope_dir.into(),
    }
  }
}

impl PackageResolver for ScopeResolver {
  fn resolve(&self, name: &str) -> PathBuf {
    self.scope_dir.join(name)
  }
}

/// Where a package's files land in the output tree.
pub fn package_output_dir(workspace: &Workspace, name: &str) -> PathBuf {
  workspace.path(Path::new(BRICKS_DIR).join(name))
}

/// Load and copy every package, returning manifests in the order of `names`.
///
/// Package destinations are disjoint by name, so duplicate names are refused
/// before any task starts.
pub async fn aggregate_packages(
  names: &[String],
  resolver: &dyn PackageResolver,
  workspace: &Workspace,
) -> Result<Vec<Value>, PackageError> {
  let mut seen = HashSet::new();
  if let Some(name) = names.iter().find(|name| !seen.insert(name.as_str())) {
    return Err(PackageError::Duplicate { name: name.clone() });
  }

  info!(count = names.len(), "aggregating brick packages");

  collect_in_order(names, |_, name| {
    let name = name.to_string();
    let source = resolver.resolve(&name);
    let destination = package_output_dir(workspace, &name);

    async move {
      let manifest = read_package_manifest(&source)
        .await
        .map_err(|e| PackageError::Manifest {
          name: name.clone(),
          source: e,
        })?;

      let stats = copy_tree(&source, &destination, None)
        .await
        .map_err(|e| PackageError::Copy {
          name: name.clone(),
          source: e,
        })?;

      debug!(package = %name, files = stats.files, bytes = stats.bytes, "package copied");
      Ok(manifest)
    }
  })
  .await
}

/// Run one task per name concurrently and return the results in the order of
/// `names`, whatever order the tasks finish in.
async fn collect_in_order<T, F, Fut>(names: &[String], mut task: F) -> Result<Vec<T>, PackageError>
where
  T: Send + 'static,
  F: FnMut(usize, &str) -> Fut,
  Fut: Future<Output = Result<T, PackageError>> + Send + 'static,
{
  let mut join_set = JoinSet::new();
  for (index, name) in names.iter().enumerate() {
    let future = task(index, name);
    join_set.spawn(async move { future.await.map(|value| (index, value)) });
  }

  let mut slots: Vec<Option<T>> = std::iter::repeat_with(|| None).take(names.len()).collect();
  while let Some(joined) = join_set.join_next().await {
    // Returning early drops the set, which aborts the remaining tasks.
    let (index, value) = joined.map_err(|e| PackageError::Task { message: e.to_string() })??;
    slots[index] = Some(value);
  }

  slots
    .into_iter()
    .zip(names)
    .map(|(slot, name)| {
      slot.ok_or_else(|| PackageError::Task {
        message: format!("package '{name}' produced no result"),
      })
    })
    .collect()
}
