//! Sync driver error type.

use nd_storage::SinkError;

/// Error from a sync pass.
///
/// Per-document failures are reported as warnings, not errors; this type
/// covers failures of the pass itself (state persistence, image download
/// plumbing).
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Sink operation failed.
    #[error("{0}")]
    Sink(#[from] SinkError),

    /// Image download failed.
    #[error("image download failed")]
    Download(#[from] ureq::Error),

    /// I/O error (state file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// State file serialization error.
    #[error("state file error: {0}")]
    Json(#[from] serde_json::Error),

    /// Image download returned an error status.
    #[error("image download failed: HTTP {status} for {url}")]
    DownloadStatus {
        /// HTTP status code.
        status: u16,
        /// Image URL.
        url: String,
    },
}
