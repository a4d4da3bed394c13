//! Test utilities for brick-shell-lib.
//!
//! Helpers that lay out the pieces of a fake project tree on disk.

use std::path::{Path, PathBuf};

use crate::consts::PACKAGE_MANIFEST_PATH;

/// Entry document shaped like the container distribution's `index.html`.
pub const ENTRY_HTML: &str = r#"<!doctype html>
<html>
<head>
<base href="<!--# echo var='base_href' default='/' -->">
<script>window.CORE_ROOT="<!--# echo var='core_root' default='' -->";window.MOCK_DATE="<!--# echo var='mock_date' default='' -->";window.PUBLIC_CDN="<!--# echo var='public_cdn' default='' -->";</script>
</head>
<body><div id="main-mount-point"></div></body>
</html>
"#;

/// Write a file relative to `root`, creating parent directories.
pub fn write_file(root: &Path, relative_path: &str, content: &str) -> PathBuf {
  let path = root.join(relative_path);
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).unwrap();
  }
  std::fs::write(&path, content).unwrap();
  path
}

/// Create a brick package directory with the given manifest content.
pub fn write_package(packages_dir: &Path, name: &str, manifest: &str) -> PathBuf {
  let dir = packages_dir.join(name);
  write_file(&dir, PACKAGE_MANIFEST_PATH, manifest);
  write_file(&dir, "dist/chunks/main.js", &format!("/* {name} */"));
  write_file(&dir, "package.json", &format!(r#"{{"name":"@next-bricks/{name}"}}"#));
  dir
}

/// Create a container distribution with an entry document and a preview subtree.
pub fn write_container(container_dir: &Path) {
  write_file(container_dir, "index.html", ENTRY_HTML);
  write_file(container_dir, "core/main.js", "/* core */");
  write_file(container_dir, "preview/index.html", "<html>preview</html>");
}
