//! Entity structs of the materialized graph view.
//!
//! Two node kinds ([`User`], [`Post`]) and two relation kinds
//! ([`FollowEdge`], [`LikeEdge`]). Counters on the nodes are denormalized
//! summaries of the relations; the projector keeps them in step.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::enums::PostSubtype;
use crate::ids::{PostId, UserId};

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A user node, created lazily the first time any event mentions it.
///
/// `followees` and `followers` keep insertion order until a removal, which
/// swaps the last element into the vacated slot. Order carries no meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Wallet address of the user.
    pub id: UserId,
    /// Users this user follows.
    pub followees: Vec<UserId>,
    /// Users following this user.
    pub followers: Vec<UserId>,
    /// Always equal to `followees.len()` after a transition.
    pub followees_count: u64,
    /// Always equal to `followers.len()` after a transition.
    pub followers_count: u64,
    /// Original posts authored.
    pub posts_count: u64,
    /// Comments authored.
    pub comments_count: u64,
    /// Posts currently liked.
    pub likes_count: u64,
    /// Reposts and quotes authored.
    pub reposts_count: u64,
    /// Timestamp of the latest authored post, repost, quote, or comment.
    pub last_post_update: u64,
}

impl User {
    /// The canonical default state: no edges, all counters zero.
    pub const fn new(id: UserId) -> Self {
        Self {
            id,
            followees: Vec::new(),
            followers: Vec::new(),
            followees_count: 0,
            followers_count: 0,
            posts_count: 0,
            comments_count: 0,
            likes_count: 0,
            reposts_count: 0,
            last_post_update: 0,
        }
    }

    /// Advance `last_post_update`, never moving it backwards.
    pub fn touch_post_update(&mut self, timestamp: u64) {
        self.last_post_update = self.last_post_update.max(timestamp);
    }
}

// ---------------------------------------------------------------------------
// Post
// ---------------------------------------------------------------------------

/// The post a derived post points back to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum PostOrigin {
    /// The post this one reposts.
    Repost(PostId),
    /// The post this one quotes.
    Quote(PostId),
    /// The post this one comments on.
    Comment(PostId),
}

impl PostOrigin {
    /// The subtype a post with this origin has.
    pub const fn subtype(&self) -> PostSubtype {
        match self {
            Self::Repost(_) => PostSubtype::Repost,
            Self::Quote(_) => PostSubtype::Quote,
            Self::Comment(_) => PostSubtype::Comment,
        }
    }

    /// The referenced origin post.
    pub const fn id(&self) -> &PostId {
        match self {
            Self::Repost(id) | Self::Quote(id) | Self::Comment(id) => id,
        }
    }
}

/// A post node. Created once per id; kind and author never change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Content-addressed identifier.
    pub id: PostId,
    /// Author of the post.
    pub author: UserId,
    /// Kind of the post.
    pub subtype: PostSubtype,
    /// Logical timestamp of the creating event.
    pub timestamp: u64,
    /// Amount burned by the author when publishing.
    pub burn_amount: Decimal,
    /// Comments pointing at this post.
    pub comments_count: u64,
    /// Users currently liking this post.
    pub likes_count: u64,
    /// Reposts and quotes pointing at this post.
    pub repost_count: u64,
    /// Origin reference; `None` for an original post.
    pub origin: Option<PostOrigin>,
}

impl Post {
    /// A new original post with zeroed counters.
    pub const fn original(
        id: PostId,
        author: UserId,
        timestamp: u64,
        burn_amount: Decimal,
    ) -> Self {
        Self {
            id,
            author,
            subtype: PostSubtype::Original,
            timestamp,
            burn_amount,
            comments_count: 0,
            likes_count: 0,
            repost_count: 0,
            origin: None,
        }
    }

    /// A new derived post whose subtype follows from its origin.
    pub const fn derived(
        id: PostId,
        author: UserId,
        origin: PostOrigin,
        timestamp: u64,
        burn_amount: Decimal,
    ) -> Self {
        Self {
            id,
            author,
            subtype: origin.subtype(),
            timestamp,
            burn_amount,
            comments_count: 0,
            likes_count: 0,
            repost_count: 0,
            origin: Some(origin),
        }
    }

    /// Origin of a repost, if this is one.
    pub const fn repost_origin_id(&self) -> Option<&PostId> {
        match &self.origin {
            Some(PostOrigin::Repost(id)) => Some(id),
            _ => None,
        }
    }

    /// Origin of a quote, if this is one.
    pub const fn quote_origin_id(&self) -> Option<&PostId> {
        match &self.origin {
            Some(PostOrigin::Quote(id)) => Some(id),
            _ => None,
        }
    }

    /// Origin of a comment, if this is one.
    pub const fn comment_origin_id(&self) -> Option<&PostId> {
        match &self.origin {
            Some(PostOrigin::Comment(id)) => Some(id),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Edges
// ---------------------------------------------------------------------------

/// `follower` follows `followee`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowEdge {
    /// The user being followed.
    pub followee: UserId,
    /// The user doing the following.
    pub follower: UserId,
    /// Logical timestamp of the follow.
    pub timestamp: u64,
}

/// `user` likes `post`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeEdge {
    /// The liking user.
    pub user: UserId,
    /// The liked post.
    pub post: PostId,
    /// Logical timestamp of the most recent like.
    pub timestamp: u64,
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn new_user_starts_empty() {
        let user = User::new(UserId::new("0xA"));
        assert!(user.followees.is_empty());
        assert!(user.followers.is_empty());
        assert_eq!(user.followees_count, 0);
        assert_eq!(user.likes_count, 0);
        assert_eq!(user.last_post_update, 0);
    }

    #[test]
    fn post_update_never_moves_backwards() {
        let mut user = User::new(UserId::new("0xA"));
        user.touch_post_update(10);
        user.touch_post_update(4);
        assert_eq!(user.last_post_update, 10);
    }

    #[test]
    fn derived_post_takes_subtype_from_origin() {
        let origin = PostId::new("QmOrigin");
        let post = Post::derived(
            PostId::new("QmQuote"),
            UserId::new("0xB"),
            PostOrigin::Quote(origin.clone()),
            7,
            dec!(1.5),
        );
        assert_eq!(post.subtype, PostSubtype::Quote);
        assert_eq!(post.quote_origin_id(), Some(&origin));
        assert_eq!(post.repost_origin_id(), None);
        assert_eq!(post.comment_origin_id(), None);
    }

    #[test]
    fn original_post_has_no_origin() {
        let post = Post::original(PostId::new("QmP"), UserId::new("0xA"), 1, Decimal::ZERO);
        assert_eq!(post.subtype, PostSubtype::Original);
        assert!(post.origin.is_none());
    }

    #[test]
    fn post_serializes_subtype_code_and_origin() {
        let post = Post::derived(
            PostId::new("QmC"),
            UserId::new("0xA"),
            PostOrigin::Comment(PostId::new("QmP")),
            3,
            Decimal::ZERO,
        );
        let value = serde_json::to_value(&post).ok();
        let value = value.as_ref();
        assert_eq!(value.and_then(|v| v.get("subtype")), Some(&serde_json::json!(1)));
        assert_eq!(
            value.and_then(|v| v.get("origin")),
            Some(&serde_json::json!({ "kind": "comment", "id": "QmP" }))
        );
    }
}
