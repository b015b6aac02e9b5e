//! In-memory reference backing for [`EntityStore`].
//!
//! Entities are held as JSON documents in one ordered table per kind, so
//! every read decodes the same serialized form an external key-value
//! backend would return. Iteration order is the storage-key order, which
//! keeps snapshots deterministic.

use std::collections::BTreeMap;

use serde_json::Value;
use simpub_types::{EntityKind, FollowEdge, LikeEdge, Post, User};

use crate::entity::Entity;
use crate::error::StoreError;
use crate::snapshot::GraphSnapshot;
use crate::store::EntityStore;

/// One table of documents keyed by storage key.
type Table = BTreeMap<String, Value>;

/// Single-writer in-memory entity store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: BTreeMap<EntityKind, Table>,
}

impl MemoryStore {
    /// Create an empty store.
    pub const fn new() -> Self {
        Self {
            tables: BTreeMap::new(),
        }
    }

    /// Number of stored entities of one kind.
    pub fn len(&self, kind: EntityKind) -> usize {
        self.tables.get(&kind).map_or(0, BTreeMap::len)
    }

    /// Whether the store holds no entities at all.
    pub fn is_empty(&self) -> bool {
        self.tables.values().all(BTreeMap::is_empty)
    }

    /// Decode every entity into a typed [`GraphSnapshot`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupt`] if any stored document does not
    /// decode as its kind.
    pub fn snapshot(&self) -> Result<GraphSnapshot, StoreError> {
        let users = self
            .decode_all::<User>()?
            .into_iter()
            .map(|user| (user.id.clone(), user))
            .collect();
        let posts = self
            .decode_all::<Post>()?
            .into_iter()
            .map(|post| (post.id.clone(), post))
            .collect();

        Ok(GraphSnapshot {
            users,
            posts,
            follows: self.decode_all::<FollowEdge>()?,
            likes: self.decode_all::<LikeEdge>()?,
        })
    }

    /// Build a store holding exactly the entities of a snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] if an entity cannot be encoded.
    pub fn from_snapshot(snapshot: &GraphSnapshot) -> Result<Self, StoreError> {
        let mut store = Self::new();
        for user in snapshot.users.values() {
            store.upsert(user)?;
        }
        for post in snapshot.posts.values() {
            store.upsert(post)?;
        }
        for edge in &snapshot.follows {
            store.upsert(edge)?;
        }
        for edge in &snapshot.likes {
            store.upsert(edge)?;
        }
        Ok(store)
    }

    fn decode_all<E: Entity>(&self) -> Result<Vec<E>, StoreError> {
        let Some(table) = self.tables.get(&E::KIND) else {
            return Ok(Vec::new());
        };
        table
            .iter()
            .map(|(key, doc)| decode::<E>(key, doc))
            .collect()
    }
}

/// Decode one stored document as `E`.
fn decode<E: Entity>(key: &str, doc: &Value) -> Result<E, StoreError> {
    E::deserialize(doc).map_err(|source| StoreError::Corrupt {
        kind: E::KIND,
        key: key.to_owned(),
        source,
    })
}

impl EntityStore for MemoryStore {
    fn load<E: Entity>(&self, key: &E::Key) -> Result<Option<E>, StoreError> {
        let storage_key = E::storage_key(key);
        self.tables
            .get(&E::KIND)
            .and_then(|table| table.get(&storage_key))
            .map(|doc| decode::<E>(&storage_key, doc))
            .transpose()
    }

    fn upsert<E: Entity>(&mut self, entity: &E) -> Result<(), StoreError> {
        let storage_key = E::storage_key(&entity.key());
        let doc = serde_json::to_value(entity).map_err(|source| StoreError::Serialization {
            kind: E::KIND,
            key: storage_key.clone(),
            source,
        })?;
        tracing::trace!(kind = %E::KIND, key = %storage_key, "upsert");
        self.tables.entry(E::KIND).or_default().insert(storage_key, doc);
        Ok(())
    }

    fn remove<E: Entity>(&mut self, key: &E::Key) -> Result<(), StoreError> {
        let storage_key = E::storage_key(key);
        if let Some(table) = self.tables.get_mut(&E::KIND) {
            if table.remove(&storage_key).is_some() {
                tracing::trace!(kind = %E::KIND, key = %storage_key, "remove");
            }
        }
        Ok(())
    }
}
