//! Types for the bundle pipeline.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::aggregate::PackageError;
use crate::config::ConfigError;
use crate::manifest::{ManifestError, StoryboardError};
use crate::template::TemplateError;
use crate::workspace::FilesystemError;

/// Fully resolved, immutable inputs of one build.
///
/// Produced by [`crate::config::BuildConfig::resolve`]; every path is absolute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildInputs {
  pub project_dir: PathBuf,
  pub out_dir: PathBuf,
  pub container_dir: PathBuf,
  /// Top-level container entries left out of the output.
  pub container_exclude: Vec<String>,
  pub packages_dir: PathBuf,
  /// Package names in bootstrap order.
  pub brick_packages: Vec<String>,
  pub storyboards: PathBuf,
  pub static_files: Vec<PathBuf>,
  /// Entry document path, relative to the output root.
  pub entry_document: String,
}

/// Summary of a successful build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildReport {
  pub out_dir: PathBuf,
  /// File name of the bootstrap manifest inside `out_dir`.
  pub bootstrap_file: String,
  pub packages: Vec<String>,
  pub storyboards: usize,
}

/// Coarse classification of build failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
  /// Missing path, permission denial, or disk I/O failure.
  Filesystem,
  /// A package manifest is missing or not valid JSON.
  ManifestParse,
  /// The storyboard file is missing, malformed, or not a sequence.
  ConfigParse,
  /// The entry document has no insertion point.
  Template,
  /// Build settings are unreadable or inconsistent.
  Config,
}

/// Any error that aborts a build. There is no partial success.
#[derive(Debug, Error)]
pub enum BuildError {
  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error(transparent)]
  Filesystem(#[from] FilesystemError),

  #[error(transparent)]
  Package(#[from] PackageError),

  #[error(transparent)]
  Storyboard(#[from] StoryboardError),

  #[error(transparent)]
  Template(#[from] TemplateError),

  #[error("failed to serialize bootstrap manifest: {0}")]
  Serialize(#[from] serde_json::Error),
}

impl BuildError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      BuildError::Config(_) => ErrorKind::Config,
      BuildError::Filesystem(_) | BuildError::Serialize(_) => ErrorKind::Filesystem,
      BuildError::Package(PackageError::Manifest { .. }) => ErrorKind::ManifestParse,
      BuildError::Package(PackageError::Duplicate { .. }) => ErrorKind::Config,
      BuildError::Package(_) => ErrorKind::Filesystem,
      BuildError::Storyboard(_) => ErrorKind::ConfigParse,
      BuildError::Template(TemplateError::MissingHeadClose) => ErrorKind::Template,
      BuildError::Template(TemplateError::Filesystem(_)) => ErrorKind::Filesystem,
    }
  }

  /// The package manifest error behind this failure, if any.
  pub fn manifest_error(&self) -> Option<&ManifestError> {
    match self {
      BuildError::Package(PackageError::Manifest { source, .. }) => Some(source),
      _ => None,
    }
  }
}
