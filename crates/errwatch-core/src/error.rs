use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by errwatch.
#[derive(Error, Debug)]
pub enum WatchError {
    /// A report file could not be opened or read from disk.
    #[error("Failed to read report {path}: {source}")]
    ReportRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// No report exists for the requested interval.
    #[error("Report not found: {0}")]
    ReportNotFound(PathBuf),

    /// The report source failed to deliver a report.
    #[error("Report fetch failed: {0}")]
    Fetch(String),

    /// Statistical routines were handed unusable input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An aggregated report lacks the category being compared.
    #[error("Category \"{category}\" missing from {period} report")]
    MissingCategory {
        category: String,
        period: &'static str,
    },

    /// The notification sink could not deliver the message.
    #[error("Notification failed: {0}")]
    Notification(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the errwatch crates.
pub type Result<T> = std::result::Result<T, WatchError>;
