//! Error types shared across the table store, record sources and export.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the table parameters and derived views.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("page size must be greater than zero")]
    ZeroPageSize,
    #[error("invalid date `{0}`, expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// Errors reported by a [`RecordSource`](crate::source::RecordSource).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("record source unavailable")]
    Unavailable,
    #[error("user {0} not found")]
    NotFound(u64),
    #[error("{0}")]
    Failed(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode csv: {0}")]
    Csv(#[from] csv::Error),
}
