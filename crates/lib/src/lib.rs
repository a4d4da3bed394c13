//! brick-shell-lib: static bundle assembly for a standalone brick shell
//!
//! This crate turns an installed container distribution, a set of brick
//! packages and a storyboard file into a deployable static tree:
//! - `Workspace`: the output directory and the copy operations into it
//! - `BootstrapManifest`: package manifests plus normalized storyboards,
//!   written under a content-fingerprinted name
//! - `patch_entry_document`: resolves server-side include markers and injects
//!   the runtime globals into the entry document
//! - `build`: the pipeline tying these together

pub mod aggregate;
pub mod bootstrap;
pub mod build;
pub mod config;
pub mod consts;
pub mod manifest;
pub mod template;
pub mod util;
pub mod workspace;
