//! Entity store interface and in-memory backing for the SimPub graph view.
//!
//! The projector never talks to a database directly. It reads and writes
//! entities through [`EntityStore`], a kind-scoped key-value interface with
//! no range queries and no transactions. [`MemoryStore`] is the reference
//! backing used by the indexer binary and the tests.
//!
//! # Modules
//!
//! - [`entity`] -- The [`Entity`] trait binding each struct to its key space
//! - [`store`] -- The [`EntityStore`] trait
//! - [`memory`] -- [`MemoryStore`], JSON documents in ordered tables
//! - [`snapshot`] -- [`GraphSnapshot`], a typed copy of the whole view
//! - [`error`] -- [`StoreError`]

pub mod entity;
pub mod error;
pub mod memory;
pub mod snapshot;
pub mod store;

pub use entity::Entity;
pub use error::StoreError;
pub use memory::MemoryStore;
pub use snapshot::GraphSnapshot;
pub use store::EntityStore;
