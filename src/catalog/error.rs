//! Catalog error types.

use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort a run: the batch cannot proceed without a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("Catalog request for page {page} failed: {source}")]
    Request {
        page: u32,
        #[source]
        source: reqwest::Error,
    },
    #[error("Catalog page {page} returned HTTP {status}")]
    Status { page: u32, status: u16 },
    #[error("Catalog page {page} is not valid JSON: {source}")]
    Decode {
        page: u32,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid catalog JSON in {}: {}", .path.display(), .source)]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("I/O error on {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CatalogError {
    /// Whether the catalog itself could not be retrieved or read, as opposed
    /// to a local filesystem failure around it.
    pub fn is_fetch_failure(&self) -> bool {
        !matches!(self, Self::Io { .. })
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
