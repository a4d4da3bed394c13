//! Entry document patching.
//!
//! The container ships `index.html` with server-side-include markers meant
//! for a multi-tenant nginx deployment, e.g.
//! `<!--# echo var='base_href' default='/' -->`. A standalone bundle has no
//! SSI layer, so each known marker is replaced with a fixed value and a
//! script exposing the runtime globals is injected before `</head>`.

use std::path::Path;

use thiserror::Error;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::workspace::FilesystemError;

const HEAD_CLOSE: &str = "</head>";

/// Prefix shared by every SSI echo marker.
const SSI_ECHO_PREFIX: &str = "<!--# echo ";

/// A server-side-include echo marker and its standalone value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder {
  pub var: &'static str,
  pub default: &'static str,
  pub replacement: &'static str,
}

impl Placeholder {
  /// The marker text exactly as it appears in the document.
  pub fn marker(&self) -> String {
    format!("{}var='{}' default='{}' -->", SSI_ECHO_PREFIX, self.var, self.default)
  }
}

/// The markers resolved for a standalone deployment.
pub const STANDALONE_PLACEHOLDERS: &[Placeholder] = &[
  Placeholder {
    var: "base_href",
    default: "/",
    replacement: "/",
  },
  Placeholder {
    var: "core_root",
    default: "",
    replacement: "",
  },
  Placeholder {
    var: "mock_date",
    default: "",
    replacement: "",
  },
  Placeholder {
    var: "public_cdn",
    default: "",
    replacement: "",
  },
];

/// Errors patching the entry document.
#[derive(Debug, Error)]
pub enum TemplateError {
  #[error("entry document has no </head> tag to inject the bootstrap script before")]
  MissingHeadClose,

  #[error(transparent)]
  Filesystem(#[from] FilesystemError),
}

/// The script that hands the runtime its standalone flags and bootstrap file.
pub fn bootstrap_script(bootstrap_file: &str) -> String {
  // Serializing a &str into JSON cannot fail.
  let file = serde_json::Value::from(bootstrap_file).to_string();
  format!(
    "<script>window.NO_AUTH_GUARD=!0;window.STANDALONE_MICRO_APPS=!0;window.APP_ROOT=\"\";window.BOOTSTRAP_FILE={}</script>",
    file
  )
}

/// Rewrite an entry document for a standalone deployment.
///
/// Every occurrence of each known marker is replaced, then the bootstrap
/// script is inserted before the first `</head>`.
pub fn patch_entry_document(html: &str, bootstrap_file: &str) -> Result<String, TemplateError> {
  let mut document = html.to_string();
  for placeholder in STANDALONE_PLACEHOLDERS {
    let marker = placeholder.marker();
    let count = document.matches(&marker).count();
    if count > 0 {
      document = document.replace(&marker, placeholder.replacement);
      debug!(var = placeholder.var, count, "resolved placeholder");
    }
  }

  let unresolved = document.matches(SSI_ECHO_PREFIX).count();
  if unresolved > 0 {
    warn!(count = unresolved, "entry document contains unrecognized SSI markers");
  }

  let head_close = document.find(HEAD_CLOSE).ok_or(TemplateError::MissingHeadClose)?;
  document.insert_str(head_close, &bootstrap_script(bootstrap_file));

  Ok(document)
}

/// Patch the entry document at `path` in place.
pub async fn patch_entry_file(path: &Path, bootstrap_file: &str) -> Result<(), TemplateError> {
  let html = fs::read_to_string(path)
    .await
    .map_err(|source| FilesystemError::Read {
      path: path.to_path_buf(),
      source,
    })?;

  let patched = patch_entry_document(&html, bootstrap_file)?;

  fs::write(path, patched)
    .await
    .map_err(|source| FilesystemError::Write {
      path: path.to_path_buf(),
      source,
    })?;

  info!(path = %path.display(), bootstrap = bootstrap_file, "patched entry document");
  Ok(())
}
