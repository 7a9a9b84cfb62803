//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod config_cmd;
mod fetch;
mod links;
mod run;
mod sweep;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::catalog::CatalogError;
use crate::config::{load_config_with_options, LoadOptions};

#[derive(Parser)]
#[command(name = "sds")]
#[command(about = "Safety data sheet catalog download tool")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true, env = "SDSACQUIRE_CONFIG")]
    config: Option<PathBuf>,

    /// Directory receiving downloaded PDFs (overrides config)
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Maximum download attempts per run, 0 for unlimited (overrides config)
    #[arg(long, global = true)]
    cap: Option<usize>,

    /// Seconds to wait for each download (overrides config)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the catalog, download every document and sweep the output directory
    Run {
        /// Skip deleting corrupt PDFs and lowercasing filenames afterwards
        #[arg(long)]
        no_sweep: bool,
        /// Show a progress bar instead of per-document lines
        #[arg(short = 'P', long)]
        progress: bool,
    },

    /// Fetch and save catalog pages only (no downloads)
    Fetch,

    /// Print resolved document URLs from saved catalog pages
    Links {
        /// Catalog response files (defaults to the configured page files)
        files: Vec<PathBuf>,
    },

    /// Delete corrupt PDFs and lowercase filenames
    Sweep {
        /// Directory to sweep (defaults to the output directory)
        dir: Option<PathBuf>,
    },

    /// Show the effective configuration
    Config,
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config_with_options(LoadOptions {
        config_path: cli.config,
        output_dir: cli.output_dir,
        download_cap: cli.cap,
        download_timeout_seconds: cli.timeout,
    })
    .await?;

    match cli.command {
        Commands::Run { no_sweep, progress } => run::cmd_run(&config, no_sweep, progress).await,
        Commands::Fetch => fetch::cmd_fetch(&config).await,
        Commands::Links { files } => links::cmd_links(&config, files).await,
        Commands::Sweep { dir } => sweep::cmd_sweep(&config, dir).await,
        Commands::Config => config_cmd::cmd_config_show(&config),
    }
}

/// Process exit code for a fatal error: 2 when the catalog could not be
/// retrieved, 1 otherwise (including local I/O around the response files).
pub fn exit_code(err: &anyhow::Error) -> ExitCode {
    let fetch_failed = err.chain().any(|cause| {
        cause
            .downcast_ref::<CatalogError>()
            .is_some_and(CatalogError::is_fetch_failure)
    });
    if fetch_failed {
        ExitCode::from(2)
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_with_overrides() {
        let cli = Cli::try_parse_from([
            "sds", "run", "--no-sweep", "--cap", "10", "--output-dir", "/tmp/out",
        ])
        .unwrap();
        assert_eq!(cli.cap, Some(10));
        assert_eq!(cli.output_dir, Some(PathBuf::from("/tmp/out")));
        assert!(matches!(
            cli.command,
            Commands::Run {
                no_sweep: true,
                progress: false
            }
        ));
    }

    #[test]
    fn test_parse_links_files() {
        let cli = Cli::try_parse_from(["sds", "links", "a.json", "b.json"]).unwrap();
        match cli.command {
            Commands::Links { files } => assert_eq!(files.len(), 2),
            _ => panic!("expected links"),
        }
    }

    #[test]
    fn test_exit_code_for_catalog_error() {
        let err = anyhow::Error::new(CatalogError::Status {
            page: 1,
            status: 500,
        })
        .context("fetching catalog");
        assert_eq!(exit_code(&err), ExitCode::from(2));

        let other = anyhow::anyhow!("bad config");
        assert_eq!(exit_code(&other), ExitCode::FAILURE);
    }

    #[test]
    fn test_exit_code_for_response_file_io_error() {
        let err = anyhow::Error::new(CatalogError::Io {
            path: PathBuf::from("/readonly/api_response_page_1.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        });
        assert_eq!(exit_code(&err), ExitCode::FAILURE);
    }
}
