//! The social events consumed by the projector.
//!
//! Events are immutable and delivered in order, at least once. Several
//! events may share a timestamp. Post ids inside events are unvalidated:
//! the producer is untrusted, and each handler decides what to check.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::{PostId, UserId};

/// One event from the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialEvent {
    /// Logical timestamp; non-decreasing along the log.
    pub timestamp: u64,
    /// The action and its parameters.
    #[serde(flatten)]
    pub kind: EventKind,
}

impl SocialEvent {
    /// Pair an action with its timestamp.
    pub const fn new(timestamp: u64, kind: EventKind) -> Self {
        Self { timestamp, kind }
    }
}

/// A social action with its kind-specific parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EventKind {
    /// `follower` started following `followee`.
    Follow {
        /// The user being followed.
        followee: UserId,
        /// The user doing the following.
        follower: UserId,
    },
    /// `unfollower` stopped following `followee`.
    UnFollow {
        /// The user being unfollowed.
        followee: UserId,
        /// The user doing the unfollowing.
        unfollower: UserId,
    },
    /// `user` liked `post`.
    Like {
        /// The liked post.
        post: PostId,
        /// The liking user.
        user: UserId,
    },
    /// `user` withdrew a like of `post`.
    UnLike {
        /// The unliked post.
        post: PostId,
        /// The user withdrawing the like.
        user: UserId,
    },
    /// `author` published an original post.
    NewPost {
        /// Id of the new post.
        post: PostId,
        /// Author of the new post.
        author: UserId,
        /// Amount burned to publish.
        #[serde(default)]
        burn: Decimal,
    },
    /// `user` reposted `origin` as `new_post`.
    Repost {
        /// The post being reposted.
        origin: PostId,
        /// The reposting user.
        user: UserId,
        /// Id of the repost itself.
        new_post: PostId,
        /// Amount burned to publish.
        #[serde(default)]
        burn: Decimal,
    },
    /// `user` quoted `origin` as `new_post`.
    Quote {
        /// The post being quoted.
        origin: PostId,
        /// The quoting user.
        user: UserId,
        /// Id of the quote itself.
        new_post: PostId,
        /// Amount burned to publish.
        #[serde(default)]
        burn: Decimal,
    },
    /// `user` commented on `origin` with `new_post`.
    Comment {
        /// The post being commented on.
        origin: PostId,
        /// The commenting user.
        user: UserId,
        /// Id of the comment itself.
        new_post: PostId,
        /// Amount burned to publish.
        #[serde(default)]
        burn: Decimal,
    },
}

impl EventKind {
    /// Stable name of the event kind, matching the serialized tag.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Follow { .. } => "Follow",
            Self::UnFollow { .. } => "UnFollow",
            Self::Like { .. } => "Like",
            Self::UnLike { .. } => "UnLike",
            Self::NewPost { .. } => "NewPost",
            Self::Repost { .. } => "Repost",
            Self::Quote { .. } => "Quote",
            Self::Comment { .. } => "Comment",
        }
    }
}
