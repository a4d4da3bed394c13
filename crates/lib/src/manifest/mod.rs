//! Readers for brick package manifests and storyboard configuration.
//!
//! Both are treated as opaque structured data: package manifests are forwarded
//! untouched, storyboards only have their `app` flags defaulted later by the
//! bootstrap assembler.

mod package;
mod storyboard;

pub use package::{ManifestError, read_package_manifest};
pub use storyboard::{Storyboard, StoryboardError, parse_storyboards, read_storyboards};
