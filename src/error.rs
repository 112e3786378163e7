//! Error types for the monitoring pipeline.
//!
//! Only fatal conditions appear here: everything recoverable (beautify,
//! dynamic capture) is absorbed at its component boundary and never
//! surfaces as an error. An unchanged bundle is a successful no-op, not
//! an error.

use thiserror::Error;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Fatal conditions that abort a run before any persistence.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The hosting page could not be fetched.
    #[error("failed to fetch hosting page {url}: {reason}")]
    PageFetch { url: String, reason: String },

    /// A fetch completed but with a non-success status.
    #[error("unexpected status {status} fetching {url}")]
    BadStatus { url: String, status: u16 },

    /// The hosting page has no recognizable reference to the bundle.
    #[error("hosting page contains no reference to a {stem}*{ext} bundle")]
    AssetNotReferenced { stem: String, ext: String },

    /// The bundle itself could not be fetched.
    #[error("failed to fetch bundle {url}: {reason}")]
    AssetFetch { url: String, reason: String },

    /// The archive could not be read or written.
    #[error("archive failure: {0}")]
    Archive(String),
}
