use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tokio::fs;
use tracing::debug;

use crate::consts::PACKAGE_MANIFEST_PATH;

/// Errors loading a brick package manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
  #[error("failed to read package manifest {}: {source}", path.display())]
  Read { path: PathBuf, source: io::Error },

  #[error("invalid JSON in package manifest {}: {source}", path.display())]
  Parse { path: PathBuf, source: serde_json::Error },
}

impl ManifestError {
  pub fn path(&self) -> &Path {
    match self {
      ManifestError::Read { path, .. } | ManifestError::Parse { path, .. } => path,
    }
  }
}

/// Load `dist/bricks.json` from a package directory.
///
/// The manifest schema belongs to the package, so the parsed value is
/// returned exactly as found.
pub async fn read_package_manifest(package_dir: &Path) -> Result<Value, ManifestError> {
  let path = package_dir.join(PACKAGE_MANIFEST_PATH);

  let content = fs::read_to_string(&path)
    .await
    .map_err(|source| ManifestError::Read {
      path: path.clone(),
      source,
    })?;

  let manifest = serde_json::from_str(&content).map_err(|source| ManifestError::Parse {
    path: path.clone(),
    source,
  })?;

  debug!(path = %path.display(), bytes = content.len(), "loaded package manifest");
  Ok(manifest)
}
