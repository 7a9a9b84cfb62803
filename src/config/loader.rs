//! Configuration loading and CLI override merging.

use std::path::PathBuf;

use super::Config;

/// Options for loading configuration.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file path (overrides auto-discovery).
    pub config_path: Option<PathBuf>,
    /// Output directory override (--output-dir).
    pub output_dir: Option<PathBuf>,
    /// Download cap override (--cap).
    pub download_cap: Option<usize>,
    /// Download timeout override in seconds (--timeout).
    pub download_timeout_seconds: Option<u64>,
}

/// Load the effective configuration.
///
/// Priority, lowest to highest: compiled-in defaults, discovered or explicit
/// config file, CLI overrides. Relative paths resolve against the working
/// directory.
pub async fn load_config_with_options(options: LoadOptions) -> anyhow::Result<Config> {
    let mut config = match options.config_path {
        Some(ref path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Config::load_from_path(path).await?
        }
        None => Config::load().await,
    };

    if let Some(ref source) = config.source_path {
        tracing::debug!("Loaded config from {}", source.display());
    }

    if let Some(output_dir) = options.output_dir {
        config.output_dir = output_dir;
    }
    if let Some(cap) = options.download_cap {
        config.download_cap = cap;
    }
    if let Some(timeout) = options.download_timeout_seconds {
        config.download_timeout_seconds = timeout;
    }

    let base_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    config.resolve_paths(&base_dir);

    Ok(config)
}
