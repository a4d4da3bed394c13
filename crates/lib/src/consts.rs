/// Project-level configuration file, looked up in the project directory.
pub const CONFIG_FILENAME: &str = "brick-shell.toml";

/// Location of the brick manifest inside a package directory.
pub const PACKAGE_MANIFEST_PATH: &str = "dist/bricks.json";

/// Output subdirectory that receives one directory per brick package.
pub const BRICKS_DIR: &str = "bricks";

pub const BOOTSTRAP_PREFIX: &str = "bootstrap";

/// Length of the hex fingerprint embedded in the bootstrap file name.
pub const FINGERPRINT_LEN: usize = 8;

/// Environment variable overriding the configured output directory.
pub const ENV_OUT_DIR: &str = "BRICK_SHELL_OUT_DIR";

/// Environment variable overriding the package list (comma-separated).
pub const ENV_PACKAGES: &str = "BRICK_SHELL_PACKAGES";
