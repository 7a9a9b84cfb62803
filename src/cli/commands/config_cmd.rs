//! Configuration display command.

use crate::cli::icons::{dim_arrow, info};
use crate::config::Config;

/// Print the effective configuration as TOML.
pub fn cmd_config_show(config: &Config) -> anyhow::Result<()> {
    match config.source_path {
        Some(ref path) => eprintln!("{} Loaded from {}", info(), path.display()),
        None => eprintln!("{} No config file found, using defaults", info()),
    }
    eprintln!("  {} Output directory: {}", dim_arrow(), config.output_dir.display());
    eprintln!();

    print!("{}", config.to_toml()?);
    Ok(())
}
