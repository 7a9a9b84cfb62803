//! Service layer for sdsacquire.
//!
//! Domain logic separated from UI concerns; the CLI renders the events these
//! services emit.

pub mod batch;
pub mod download;
pub mod sweep;

pub use batch::{collect_references, BatchEvent, BatchReport, BatchRunner};
pub use download::{DownloadError, DownloadOutcome, Downloader};
pub use sweep::{sweep, validate_pdf, SweepReport};
