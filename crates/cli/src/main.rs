mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::output::{OutputFormat, print_error};

/// brick-shell - Assemble a standalone brick shell bundle
#[derive(Parser)]
#[command(name = "brick-shell")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Assemble the static bundle into the output directory
  Build {
    #[command(flatten)]
    project: ProjectArgs,

    /// Output directory (overrides config and BRICK_SHELL_OUT_DIR)
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Brick package to bundle; repeat to list several (overrides config and BRICK_SHELL_PACKAGES)
    #[arg(long = "package", value_name = "NAME")]
    packages: Vec<String>,
  },

  /// Show the resolved build configuration
  Info {
    #[command(flatten)]
    project: ProjectArgs,
  },
}

#[derive(Args)]
struct ProjectArgs {
  /// Project directory containing brick-shell.toml and node_modules
  #[arg(long, default_value = ".")]
  project_dir: PathBuf,

  /// Output format
  #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
  output: OutputFormat,
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let result = match cli.command {
    Commands::Build {
      project,
      out_dir,
      packages,
    } => cmd::cmd_build(&project.project_dir, out_dir, packages, project.output),
    Commands::Info { project } => cmd::cmd_info(&project.project_dir, project.output),
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&format!("{err:#}"));
      ExitCode::FAILURE
    }
  }
}
