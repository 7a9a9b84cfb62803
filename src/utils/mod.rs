//! Shared utility functions.
//!
//! - `filename`: reference to URL/filename normalization and deduplication

mod filename;

pub use filename::{derive_filename, dedupe_references, is_absolute_url, resolve_url};
