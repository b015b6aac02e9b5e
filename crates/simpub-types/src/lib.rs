//! Shared type definitions for the SimPub graph indexer.
//!
//! This crate is the single source of truth for the identifiers, entities,
//! and events used across the workspace. It holds no logic beyond
//! construction helpers and the post-id shape check.
//!
//! # Modules
//!
//! - [`ids`] -- String-backed identifiers, composite relation keys, post-id validation
//! - [`enums`] -- Post subtypes and entity kinds
//! - [`structs`] -- The four entities of the graph view
//! - [`events`] -- The social events consumed by the projector

pub mod enums;
pub mod events;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{EntityKind, PostSubtype, UnknownSubtype};
pub use events::{EventKind, SocialEvent};
pub use ids::{
    FollowKey, KEY_SEPARATOR, LikeKey, POST_ID_LEN, POST_ID_PREFIX, PostId, UserId,
    is_valid_post_id,
};
pub use structs::{FollowEdge, LikeEdge, Post, PostOrigin, User};
