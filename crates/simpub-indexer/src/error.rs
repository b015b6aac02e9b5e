//! Error types for the indexer binary.
//!
//! [`IndexerError`] covers everything that can stop a replay. Errors tied
//! to a position in the event log carry its one-based line number.

use std::path::PathBuf;

/// Top-level error for the indexer.
#[derive(Debug, thiserror::Error)]
pub enum IndexerError {
    /// The event log could not be opened.
    #[error("failed to open event log {}: {source}", path.display())]
    Open {
        /// Path of the event log.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Reading a line of the event log failed.
    #[error("line {line}: read failed: {source}")]
    Read {
        /// One-based line number in the log.
        line: usize,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A line of the event log is not a valid event.
    #[error("line {line}: invalid event: {source}")]
    Parse {
        /// One-based line number in the log.
        line: usize,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// A timestamp went backwards while strict ordering is on.
    #[error("line {line}: timestamp {timestamp} is before previous timestamp {previous}")]
    OutOfOrder {
        /// One-based line number in the log.
        line: usize,
        /// Timestamp of the offending event.
        timestamp: u64,
        /// Timestamp of the event before it.
        previous: u64,
    },

    /// The projector failed to apply an event.
    #[error("projection failed at line {line}: {source}")]
    Projection {
        /// One-based line number in the log.
        line: usize,
        /// The underlying projector error.
        source: simpub_projector::ProjectionError,
    },

    /// The store failed outside event handling.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: simpub_store::StoreError,
    },
}
