//! Error type shared by the session, model parsing and the CLI.
//!
//! The scrape loop itself never surfaces these to its caller; they are logged
//! and turned into an early stop or a skipped listing.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Transport level failure (connect, timeout, body decode)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid proxy '{proxy}': {source}")]
    Proxy {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("could not load CA certificate {path:?}: {reason}")]
    CaCert { path: PathBuf, reason: String },

    #[error("unknown country: '{0}'")]
    UnknownCountry(String),

    #[error("unknown site: '{0}'")]
    UnknownSite(String),

    #[error("unknown description format: '{0}'")]
    UnknownFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
