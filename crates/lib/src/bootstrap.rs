//! Bootstrap manifest assembly.
//!
//! The bootstrap manifest is the first file the runtime fetches. Its name
//! embeds a fingerprint of its exact bytes, so planning (assemble, serialize,
//! name) is kept apart from the write and can be tested without a filesystem.
//!
//! # Format
//!
//! ```json
//! {"brickPackages":[{"bricks":[...]}],"storyboards":[{"app":{"noAuthGuard":true,"standaloneMode":true,"id":"hello"}}]}
//! ```

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};
use tokio::fs;
use tracing::info;

use crate::consts::BOOTSTRAP_PREFIX;
use crate::manifest::Storyboard;
use crate::util::hash::{ContentFingerprint, fingerprint};
use crate::workspace::FilesystemError;

/// App flags every storyboard receives unless it sets them itself.
pub const DEFAULT_APP_FLAGS: &[(&str, bool)] = &[("noAuthGuard", true), ("standaloneMode", true)];

/// The aggregated descriptor consumed by the runtime.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapManifest {
  /// Package manifests in declaration order.
  pub brick_packages: Vec<Value>,
  /// Normalized storyboards in file order.
  pub storyboards: Vec<Storyboard>,
}

/// A serialized bootstrap manifest and the file name derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapFile {
  pub file_name: String,
  pub fingerprint: ContentFingerprint,
  pub contents: Vec<u8>,
}

impl BootstrapManifest {
  /// Assemble from package manifests and raw storyboards.
  pub fn assemble(brick_packages: Vec<Value>, storyboards: Vec<Storyboard>) -> Self {
    Self {
      brick_packages,
      storyboards: storyboards.into_iter().map(normalize_storyboard).collect(),
    }
  }

  /// Serialize compactly and name the result after its fingerprint.
  pub fn plan(&self) -> Result<BootstrapFile, serde_json::Error> {
    let contents = serde_json::to_vec(self)?;
    let fingerprint = fingerprint(&contents);

    Ok(BootstrapFile {
      file_name: bootstrap_file_name(&fingerprint),
      fingerprint,
      contents,
    })
  }
}

impl BootstrapFile {
  /// Write the manifest into `out_dir`, returning the full path.
  pub async fn write(&self, out_dir: &Path) -> Result<PathBuf, FilesystemError> {
    let path = out_dir.join(&self.file_name);
    fs::write(&path, &self.contents)
      .await
      .map_err(|source| FilesystemError::Write {
        path: path.clone(),
        source,
      })?;

    info!(
      file = %self.file_name,
      bytes = self.contents.len(),
      "wrote bootstrap manifest"
    );
    Ok(path)
  }
}

pub fn bootstrap_file_name(fingerprint: &ContentFingerprint) -> String {
  format!("{}.{}.json", BOOTSTRAP_PREFIX, fingerprint)
}

/// Apply default app flags to one storyboard.
///
/// The merge is shallow: keys already present in `app` keep their values and
/// their position after the defaults, absent keys get the default. Nothing
/// below `app` is touched.
pub fn normalize_storyboard(storyboard: Storyboard) -> Storyboard {
  let mut fields = storyboard.into_inner();

  let mut app: Map<String, Value> = DEFAULT_APP_FLAGS
    .iter()
    .map(|(key, value)| ((*key).to_string(), Value::Bool(*value)))
    .collect();

  match fields.get_mut("app") {
    Some(existing) => {
      if let Value::Object(own) = existing.take() {
        app.extend(own);
      }
      *existing = Value::Object(app);
    }
    None => {
      fields.insert("app".to_string(), Value::Object(app));
    }
  }

  Storyboard(fields)
}
