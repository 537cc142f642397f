//! Station subsystem error types.

use crate::enrich::FetchError;

/// Errors from the station source or snapshot handling.
#[derive(Debug, thiserror::Error)]
pub enum StationError {
    /// The external station source failed
    #[error("station source error: {0}")]
    Fetch(#[from] FetchError),

    /// Snapshot read/write failed
    #[error("snapshot error: {message}")]
    Snapshot { message: String },
}
