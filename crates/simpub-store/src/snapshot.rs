//! A typed, serializable copy of the whole graph view.
//!
//! Snapshots are what the indexer writes out after a replay and what the
//! invariant verifier inspects. Edges are kept as lists sorted by storage
//! key because their composite keys are not valid JSON object keys.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use simpub_types::{FollowEdge, FollowKey, LikeEdge, LikeKey, Post, PostId, User, UserId};

/// Every entity in the view, grouped by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// User nodes keyed by address.
    pub users: BTreeMap<UserId, User>,
    /// Post nodes keyed by id.
    pub posts: BTreeMap<PostId, Post>,
    /// Follow relations.
    pub follows: Vec<FollowEdge>,
    /// Like relations.
    pub likes: Vec<LikeEdge>,
}

impl GraphSnapshot {
    /// Look up a user.
    pub fn user(&self, id: &UserId) -> Option<&User> {
        self.users.get(id)
    }

    /// Look up a post.
    pub fn post(&self, id: &PostId) -> Option<&Post> {
        self.posts.get(id)
    }

    /// Look up a follow relation.
    pub fn follow(&self, key: &FollowKey) -> Option<&FollowEdge> {
        self.follows
            .iter()
            .find(|edge| edge.followee == key.followee && edge.follower == key.follower)
    }

    /// Look up a like relation.
    pub fn like(&self, key: &LikeKey) -> Option<&LikeEdge> {
        self.likes
            .iter()
            .find(|edge| edge.user == key.user && edge.post == key.post)
    }

    /// Total number of entities across all kinds.
    pub fn entity_count(&self) -> usize {
        self.users
            .len()
            .saturating_add(self.posts.len())
            .saturating_add(self.follows.len())
            .saturating_add(self.likes.len())
    }
}
