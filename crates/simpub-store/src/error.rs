//! Error types for the entity store.
//!
//! Absence is never an error: `load` returns `None` and `remove` of a
//! missing key succeeds. Errors cover only documents that cannot be
//! written or read back.

use simpub_types::EntityKind;

/// Errors that can occur in an [`EntityStore`](crate::EntityStore) call.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An entity could not be encoded for storage.
    #[error("failed to serialize {kind} {key}: {source}")]
    Serialization {
        /// Kind of the entity being written.
        kind: EntityKind,
        /// Storage key of the entity.
        key: String,
        /// The underlying encoding error.
        source: serde_json::Error,
    },

    /// A stored document does not decode into its entity kind.
    #[error("stored {kind} {key} is corrupt: {source}")]
    Corrupt {
        /// Kind of the entity being read.
        kind: EntityKind,
        /// Storage key of the entity.
        key: String,
        /// The underlying decoding error.
        source: serde_json::Error,
    },
}
