// src/error.rs
use std::time::Duration;

use thiserror::Error;

/// Failure while retrieving the raw calendar document.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("calendar request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("calendar request timed out after {0:?}")]
    Timeout(Duration),
    #[error("calendar source returned HTTP {0}")]
    Status(reqwest::StatusCode),
}

/// Structural failure while parsing the calendar document.
/// Row-level problems are not errors; malformed rows are skipped.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("calendar table not found")]
    TableNotFound,
}

/// Failure in the snapshot persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot serialization failed: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Any failure inside a single refresh attempt (fetch or extract). A failed
/// save is not refresh-fatal; the coordinator logs it and keeps the data.
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Extract(#[from] ExtractionError),
}

/// Terminal failure: the refresh failed and no snapshot, however stale,
/// was available to fall back to.
#[derive(Debug, Error)]
#[error("calendar unavailable: {source}")]
pub struct AcquisitionError {
    #[from]
    pub source: RefreshError,
}
