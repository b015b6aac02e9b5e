//! Event-to-graph projection for the SimPub indexer.
//!
//! The [`GraphProjector`] consumes [`SocialEvent`]s in log order and keeps a
//! graph view of users, posts, follows, and likes in an [`EntityStore`].
//! Every handler is a guarded read-modify-write: missing references and
//! replayed creations are skipped, never errors.
//!
//! # Modules
//!
//! - [`projector`] -- The [`GraphProjector`] and its eight handlers
//! - [`outcome`] -- [`ApplyOutcome`] and [`SkipReason`]
//! - [`verify`] -- Recompute every counter from relations and compare
//! - [`config`] -- [`IndexerConfig`] and the [`ReplayMode`] switch
//! - [`error`] -- [`ProjectionError`]
//!
//! # Invariants
//!
//! After every handler, in [`ReplayMode::Idempotent`]:
//!
//! ```text
//! user.followers_count == len(user.followers)
//! FollowEdge(a, b) exists  <=>  b in a.followers  and  a in b.followees
//! post.likes_count == number of LikeEdges on post
//! ```
//!
//! # Usage
//!
//! ```
//! use simpub_projector::{ApplyOutcome, GraphProjector};
//! use simpub_store::MemoryStore;
//! use simpub_types::{EventKind, SocialEvent, UserId};
//!
//! let mut projector = GraphProjector::new(MemoryStore::new());
//! let follow = SocialEvent::new(
//!     1,
//!     EventKind::Follow {
//!         followee: UserId::new("0xa"),
//!         follower: UserId::new("0xb"),
//!     },
//! );
//!
//! assert_eq!(projector.handle(&follow).ok(), Some(ApplyOutcome::Applied));
//! assert!(projector.handle(&follow).is_ok_and(|o| !o.is_applied()));
//! ```
//!
//! [`SocialEvent`]: simpub_types::SocialEvent
//! [`EntityStore`]: simpub_store::EntityStore

mod adjacency;
mod counters;
mod guards;

pub mod config;
pub mod error;
pub mod outcome;
pub mod projector;
pub mod verify;

pub use config::{
    ConfigError, IndexerConfig, LoggingConfig, OutputConfig, ProjectorConfig, ReplayMode,
    SourceConfig,
};
pub use error::ProjectionError;
pub use outcome::{ApplyOutcome, SkipReason};
pub use projector::GraphProjector;
pub use verify::{VerifyResult, ViewAnomaly, verify_view};
