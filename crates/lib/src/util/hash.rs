//! Content fingerprints for cache-busting file names.
//!
//! A fingerprint is the leading `FINGERPRINT_LEN` hex digits of the SHA-1 of
//! a byte payload. It names files, it does not protect them.

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

use crate::consts::FINGERPRINT_LEN;

/// A short content-derived identifier.
///
/// # Format
///
/// A lowercase hexadecimal string of `FINGERPRINT_LEN` characters, e.g. `"3f2a9c01"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContentFingerprint(pub String);

impl ContentFingerprint {
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl std::fmt::Display for ContentFingerprint {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Hash arbitrary bytes.
///
/// Returns the full 40-character SHA-1 hash.
pub fn hash_bytes(data: &[u8]) -> String {
  let mut hasher = Sha1::new();
  hasher.update(data);
  format!("{:x}", hasher.finalize())
}

/// Fingerprint a payload.
pub fn fingerprint(data: &[u8]) -> ContentFingerprint {
  let full = hash_bytes(data);
  ContentFingerprint(full[..FINGERPRINT_LEN].to_string())
}
