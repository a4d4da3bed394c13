//! Output directory lifecycle and copy operations.
//!
//! The output tree is rebuilt from scratch on every run: [`Workspace::reset`]
//! deletes whatever a previous build left behind before anything is copied in.
//!
//! None of these operations lock. Concurrent callers must write to disjoint
//! destination subtrees.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tracing::debug;
use walkdir::WalkDir;

/// Predicate over candidate source paths. Returning `true` skips the path,
/// and for a directory its whole subtree.
pub type ExcludeFilter = Box<dyn Fn(&Path) -> bool + Send + Sync>;

/// Errors raised by filesystem operations on the output tree.
#[derive(Debug, Error)]
pub enum FilesystemError {
  #[error("source does not exist: {}", path.display())]
  MissingSource { path: PathBuf },

  #[error("failed to remove {}: {source}", path.display())]
  Remove { path: PathBuf, source: io::Error },

  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: io::Error },

  #[error("failed to copy {} to {}: {source}", from.display(), to.display())]
  Copy {
    from: PathBuf,
    to: PathBuf,
    source: io::Error,
  },

  #[error("failed to walk {}: {message}", path.display())]
  Walk { path: PathBuf, message: String },

  #[error("failed to read {}: {source}", path.display())]
  Read { path: PathBuf, source: io::Error },

  #[error("failed to write {}: {source}", path.display())]
  Write { path: PathBuf, source: io::Error },

  #[error("filesystem task failed: {message}")]
  Task { message: String },
}

/// Counts reported by a tree copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
  pub files: usize,
  pub bytes: u64,
}

/// The build output directory.
#[derive(Debug, Clone)]
pub struct Workspace {
  root: PathBuf,
}

impl Workspace {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Resolve a path relative to the output root.
  pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
    self.root.join(relative)
  }

  /// Delete the output directory if it exists, then create it empty.
  ///
  /// A missing output directory is not an error. Intermediate directories
  /// are created as needed.
  pub async fn reset(&self) -> Result<(), FilesystemError> {
    match fs::symlink_metadata(&self.root).await {
      Ok(meta) => {
        let removed = if meta.is_dir() {
          fs::remove_dir_all(&self.root).await
        } else {
          fs::remove_file(&self.root).await
        };
        removed.map_err(|source| FilesystemError::Remove {
          path: self.root.clone(),
          source,
        })?;
        debug!(path = %self.root.display(), "removed previous output");
      }
      Err(e) if e.kind() == io::ErrorKind::NotFound => {}
      Err(source) => {
        return Err(FilesystemError::Remove {
          path: self.root.clone(),
          source,
        });
      }
    }

    fs::create_dir_all(&self.root)
      .await
      .map_err(|source| FilesystemError::CreateDir {
        path: self.root.clone(),
        source,
      })
  }
}

/// Build a filter that skips the named top-level entries of `root`.
///
/// Matching is per path component, so excluding `preview` skips
/// `root/preview/**` but keeps a sibling file such as `root/preview.js`.
pub fn exclude_subtrees(root: &Path, names: &[String]) -> ExcludeFilter {
  let excluded: Vec<PathBuf> = names.iter().map(|name| root.join(name)).collect();
  Box::new(move |path: &Path| excluded.iter().any(|prefix| path.starts_with(prefix)))
}

/// Recursively copy `source` into `destination`.
///
/// The destination is created if absent and existing files are overwritten.
/// Symlinks are followed, so linked package directories are copied as real
/// content. On failure the partially written destination is left in place.
pub async fn copy_tree(
  source: &Path,
  destination: &Path,
  exclude: Option<ExcludeFilter>,
) -> Result<CopyStats, FilesystemError> {
  let source = source.to_path_buf();
  let destination = destination.to_path_buf();

  tokio::task::spawn_blocking(move || copy_tree_blocking(&source, &destination, exclude.as_ref()))
    .await
    .map_err(|e| FilesystemError::Task { message: e.to_string() })?
}

fn copy_tree_blocking(
  source: &Path,
  destination: &Path,
  exclude: Option<&ExcludeFilter>,
) -> Result<CopyStats, FilesystemError> {
  if !source.is_dir() {
    return Err(FilesystemError::MissingSource {
      path: source.to_path_buf(),
    });
  }

  let mut stats = CopyStats::default();

  let walker = WalkDir::new(source)
    .follow_links(true)
    .sort_by_file_name()
    .into_iter()
    .filter_entry(|e| e.depth() == 0 || !exclude.is_some_and(|skip| skip(e.path())));

  for entry in walker {
    let entry = entry.map_err(|e| FilesystemError::Walk {
      path: source.to_path_buf(),
      message: e.to_string(),
    })?;

    let rel_path = entry.path().strip_prefix(source).unwrap_or(entry.path());
    let target = destination.join(rel_path);

    let file_type = entry.file_type();
    if file_type.is_dir() {
      std::fs::create_dir_all(&target).map_err(|source| FilesystemError::CreateDir {
        path: target.clone(),
        source,
      })?;
    } else if file_type.is_file() {
      let bytes = std::fs::copy(entry.path(), &target).map_err(|source| FilesystemError::Copy {
        from: entry.path().to_path_buf(),
        to: target.clone(),
        source,
      })?;
      stats.files += 1;
      stats.bytes += bytes;
    } else {
      // Sockets, devices, dangling links
      debug!(path = %entry.path().display(), "skipping special file");
    }
  }

  debug!(
    from = %source.display(),
    to = %destination.display(),
    files = stats.files,
    bytes = stats.bytes,
    "copied tree"
  );

  Ok(stats)
}

/// Copy a single file, overwriting the destination.
///
/// Parent directories of `destination` are created as needed.
pub async fn copy_file(source: &Path, destination: &Path) -> Result<u64, FilesystemError> {
  match fs::metadata(source).await {
    Ok(meta) if meta.is_file() => {}
    Ok(_) => {
      return Err(FilesystemError::MissingSource {
        path: source.to_path_buf(),
      });
    }
    Err(e) if e.kind() == io::ErrorKind::NotFound => {
      return Err(FilesystemError::MissingSource {
        path: source.to_path_buf(),
      });
    }
    Err(source_err) => {
      return Err(FilesystemError::Read {
        path: source.to_path_buf(),
        source: source_err,
      });
    }
  }

  if let Some(parent) = destination.parent() {
    fs::create_dir_all(parent)
      .await
      .map_err(|source| FilesystemError::CreateDir {
        path: parent.to_path_buf(),
        source,
      })?;
  }

  let bytes = fs::copy(source, destination)
    .await
    .map_err(|e| FilesystemError::Copy {
      from: source.to_path_buf(),
      to: destination.to_path_buf(),
      source: e,
    })?;

  debug!(from = %source.display(), to = %destination.display(), bytes, "copied file");
  Ok(bytes)
}
