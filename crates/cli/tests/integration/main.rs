//! CLI integration tests against a fake project tree.

mod build_tests;
mod common;
mod info_tests;
