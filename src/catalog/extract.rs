//! Document reference extraction from persisted catalog responses.

use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};

use super::CatalogError;

/// Collect every `pdfname` under `response.items`, in catalog order.
///
/// Structural surprises (missing `response`, `items` that is not an array,
/// items without a string `pdfname`) degrade to skipping rather than failing.
/// Duplicates are kept.
pub fn extract_pdfnames_from_value(data: &Value) -> Vec<String> {
    let items = match data.get("response").and_then(|r| r.get("items")) {
        Some(items) => items,
        None => {
            warn!("Catalog response has no response.items; treating as empty");
            return Vec::new();
        }
    };

    let items = match items.as_array() {
        Some(arr) => arr,
        None => {
            warn!("Catalog 'items' is not a list; treating as empty");
            return Vec::new();
        }
    };

    let mut names = Vec::with_capacity(items.len());
    for item in items {
        match item.get("pdfname") {
            Some(Value::String(name)) => names.push(name.clone()),
            Some(other) => debug!("Skipping non-string pdfname: {}", other),
            None => {}
        }
    }
    names
}

/// Read a persisted catalog response and extract its document references.
///
/// Unreadable files and invalid JSON are errors.
pub async fn extract_pdfnames(path: &Path) -> Result<Vec<String>, CatalogError> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CatalogError::io(path, e))?;

    let data: Value = serde_json::from_str(&contents).map_err(|source| CatalogError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let names = extract_pdfnames_from_value(&data);
    debug!("Extracted {} references from {}", names.len(), path.display());
    Ok(names)
}
