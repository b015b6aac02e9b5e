//! Error types for the projector.
//!
//! Missing or malformed input is not an error: handlers report it as a
//! skipped event. A [`ProjectionError`] means the store failed or the view
//! already holds state no sequence of handlers could have produced.

use simpub_store::StoreError;

/// Errors that abort a handler invocation.
#[derive(Debug, thiserror::Error)]
pub enum ProjectionError {
    /// The entity store failed.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: StoreError,
    },

    /// A counter would exceed `u64::MAX`.
    #[error("counter overflow: {field} of {owner}")]
    CounterOverflow {
        /// Name of the counter field.
        field: &'static str,
        /// Key of the entity owning the counter.
        owner: String,
    },

    /// A counter would drop below zero while its relation still exists.
    #[error("counter underflow: {field} of {owner} is already zero")]
    CounterUnderflow {
        /// Name of the counter field.
        field: &'static str,
        /// Key of the entity owning the counter.
        owner: String,
    },
}
