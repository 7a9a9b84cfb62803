//! SDS catalog retrieval.
//!
//! The catalog is a paged POST API returning `{response: {items: [...]}}`.
//! Each page is persisted verbatim to `{base}_page_{n}.json` so the extraction
//! step (and `sds links`) can work from disk.

mod error;
mod extract;

pub use error::CatalogError;
pub use extract::{extract_pdfnames, extract_pdfnames_from_value};

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::http_client::HttpClient;

/// Anything that can produce the persisted catalog response files for a run.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch every configured page and persist it, returning the written paths
    /// in page order.
    async fn fetch(&self) -> Result<Vec<PathBuf>, CatalogError>;
}

/// Empty date filter object; the API requires the key but not any contents.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DateFilter {}

#[derive(Debug, Clone, Default, Serialize)]
pub struct QuerySearchModel {
    #[serde(rename = "RevisionDateFilter")]
    pub revision_date_filter: DateFilter,
    #[serde(rename = "PublishDateFilter")]
    pub publish_date_filter: DateFilter,
}

/// Request body for one catalog page.
#[derive(Debug, Clone, Serialize)]
pub struct PagedDataRequest {
    #[serde(rename = "IsExportToExcel")]
    pub is_export_to_excel: bool,
    #[serde(rename = "QuerySearchModel")]
    pub query_search_model: QuerySearchModel,
    #[serde(rename = "pageNumber")]
    pub page_number: u32,
    #[serde(rename = "pageSize")]
    pub page_size: u32,
}

impl PagedDataRequest {
    pub fn new(page_number: u32, page_size: u32) -> Self {
        Self {
            is_export_to_excel: false,
            query_search_model: QuerySearchModel::default(),
            page_number,
            page_size,
        }
    }
}

/// HTTP-backed catalog source.
pub struct CatalogClient {
    client: HttpClient,
    endpoint: String,
    page_size: u32,
    response_paths: Vec<PathBuf>,
}

impl CatalogClient {
    /// Create a catalog client from configuration.
    pub fn new(config: &Config) -> Result<Self, CatalogError> {
        let client = HttpClient::new(
            config.request_timeout(),
            config.user_agent.as_deref(),
            &config.headers,
        )
        .map_err(CatalogError::Client)?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            page_size: config.page_size,
            response_paths: config.response_paths(),
        })
    }

    async fn fetch_page(&self, page: u32) -> Result<Value, CatalogError> {
        let body = PagedDataRequest::new(page, self.page_size);
        debug!("Requesting catalog page {} from {}", page, self.endpoint);

        let response = self
            .client
            .post_json(&self.endpoint, &body)
            .await
            .map_err(|source| CatalogError::Request { page, source })?;

        if !response.is_success() {
            return Err(CatalogError::Status {
                page,
                status: response.status.as_u16(),
            });
        }

        let content_type = response.content_type().map(|s| s.to_string());
        let text = response
            .text()
            .await
            .map_err(|source| CatalogError::Request { page, source })?;

        serde_json::from_str(&text).map_err(|source| {
            warn!(
                "Catalog page {} is not JSON (content-type: {})",
                page,
                content_type.as_deref().unwrap_or("unknown")
            );
            CatalogError::Decode { page, source }
        })
    }
}

#[async_trait]
impl CatalogSource for CatalogClient {
    async fn fetch(&self) -> Result<Vec<PathBuf>, CatalogError> {
        let mut written = Vec::with_capacity(self.response_paths.len());

        for (idx, path) in self.response_paths.iter().enumerate() {
            let page = idx as u32 + 1;
            let data = self.fetch_page(page).await?;
            write_response(path, &data).await?;

            let items = data
                .get("response")
                .and_then(|r| r.get("items"))
                .and_then(|i| i.as_array())
                .map(|a| a.len())
                .unwrap_or(0);
            info!("Saved page {} ({} items) to {}", page, items, path.display());

            written.push(path.clone());
        }

        Ok(written)
    }
}

/// Persist a catalog response as four-space indented UTF-8 JSON.
pub async fn write_response(path: &Path, data: &Value) -> Result<(), CatalogError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| CatalogError::io(parent, e))?;
    }

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    data.serialize(&mut serializer)
        .map_err(|source| CatalogError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    tokio::fs::write(path, buf)
        .await
        .map_err(|e| CatalogError::io(path, e))
}

/// Delete response files left by a previous run. Returns how many were removed.
pub async fn remove_stale_responses(paths: &[PathBuf]) -> Result<usize, CatalogError> {
    let mut removed = 0;
    for path in paths {
        match tokio::fs::remove_file(path).await {
            Ok(()) => {
                debug!("Removed stale catalog response {}", path.display());
                removed += 1;
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(CatalogError::io(path, e)),
        }
    }
    Ok(removed)
}
