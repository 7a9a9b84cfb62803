//! Catalog fetch command.

use crate::catalog::{extract_pdfnames, remove_stale_responses, CatalogClient, CatalogSource};
use crate::cli::icons::{dim_arrow, info, success};
use crate::config::Config;

/// Replace the saved catalog pages with a fresh copy.
pub async fn cmd_fetch(config: &Config) -> anyhow::Result<()> {
    let paths = config.response_paths();
    remove_stale_responses(&paths).await?;

    println!(
        "{} Fetching {} catalog page(s) from {}",
        info(),
        config.pages,
        config.endpoint
    );

    let client = CatalogClient::new(config)?;
    let written = client.fetch().await?;

    for path in &written {
        let count = extract_pdfnames(path).await?.len();
        println!("  {} {} ({} documents)", dim_arrow(), path.display(), count);
    }
    println!("{} Saved {} catalog page(s)", success(), written.len());
    Ok(())
}
