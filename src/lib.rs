//! sdsacquire - safety data sheet acquisition.
//!
//! Fetches a paged SDS catalog, extracts document references, downloads each
//! PDF through a browser session and sweeps the results for corrupt files.

pub mod browser;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod http_client;
pub mod services;
pub mod utils;
