//! The keyed load/upsert/remove interface the projector reads and writes
//! through.
//!
//! Each call is atomic on its own; nothing groups calls into a
//! transaction. Callers that read, mutate, and write back rely on being the
//! only writer.

use crate::entity::Entity;
use crate::error::StoreError;

/// Kind-scoped key-value storage for graph entities.
pub trait EntityStore {
    /// Fetch an entity by key, or `None` if it is absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupt`] if the stored document does not
    /// decode as `E`.
    fn load<E: Entity>(&self, key: &E::Key) -> Result<Option<E>, StoreError>;

    /// Write an entity, overwriting any entity with the same key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] if the entity cannot be encoded.
    fn upsert<E: Entity>(&mut self, entity: &E) -> Result<(), StoreError>;

    /// Delete an entity by key. Deleting an absent key is a no-op.
    fn remove<E: Entity>(&mut self, key: &E::Key) -> Result<(), StoreError>;

    /// Whether an entity with this key is present.
    fn exists<E: Entity>(&self, key: &E::Key) -> Result<bool, StoreError> {
        Ok(self.load::<E>(key)?.is_some())
    }
}
