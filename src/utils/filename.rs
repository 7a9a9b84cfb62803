//! Document reference normalization.
//!
//! Catalog entries carry either a full URL or a path relative to the document
//! host. These helpers turn a reference into a fetchable URL and a safe local
//! filename.

use std::collections::HashSet;

use url::Url;

/// Schemes accepted as "already absolute" when resolving references.
const ABSOLUTE_SCHEMES: &[&str] = &["http", "https", "ftp"];

/// Check whether a reference is a well-formed absolute URL.
///
/// Requires a known scheme and a non-empty host. Strings containing whitespace
/// are rejected even though the URL parser would trim them.
pub fn is_absolute_url(candidate: &str) -> bool {
    if candidate.chars().any(char::is_whitespace) {
        return false;
    }

    match Url::parse(candidate) {
        Ok(url) => {
            ABSOLUTE_SCHEMES.contains(&url.scheme())
                && url.host_str().is_some_and(|host| !host.is_empty())
        }
        Err(_) => false,
    }
}

/// Resolve a reference against the document base URL.
///
/// Absolute URLs are returned unchanged. Anything else is treated as relative
/// and appended to `base_url` verbatim (no path joining, no normalization).
pub fn resolve_url(reference: &str, base_url: &str) -> String {
    if is_absolute_url(reference) {
        reference.to_string()
    } else {
        format!("{}{}", base_url, reference)
    }
}

/// Derive a filesystem-safe filename from a URL or path.
///
/// Takes the last path segment (query and fragment ignored), lowercases it and
/// drops every character outside `[a-z0-9._-]`. The result can be empty and is
/// not guaranteed to be unique across references.
pub fn derive_filename(url: &str) -> String {
    let without_suffix = url.split(['?', '#']).next().unwrap_or_default();

    let path = match without_suffix.find("://") {
        Some(idx) => {
            let rest = &without_suffix[idx + 3..];
            rest.find('/').map(|p| &rest[p..]).unwrap_or("")
        }
        None => without_suffix,
    };

    let segment = path.rsplit('/').next().unwrap_or_default();

    segment
        .to_lowercase()
        .chars()
        .filter(|c| matches!(c, 'a'..='z' | '0'..='9' | '.' | '_' | '-'))
        .collect()
}

/// Remove exact duplicates, keeping the first occurrence of each reference.
///
/// Comparison is case-sensitive: `a.pdf` and `A.PDF` are distinct references.
pub fn dedupe_references(references: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(references.len());
    references
        .into_iter()
        .filter(|r| seen.insert(r.clone()))
        .collect()
}
