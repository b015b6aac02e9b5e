//! Enumeration types for the SimPub graph view.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Post subtype
// ---------------------------------------------------------------------------

/// The kind of a post, serialized as its protocol code.
///
/// The numeric codes are fixed by the producer and are not contiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PostSubtype {
    /// A standalone post.
    Original,
    /// A reply to another post.
    Comment,
    /// A plain re-share of another post.
    Repost,
    /// A re-share with added content.
    Quote,
}

impl PostSubtype {
    /// Protocol code for this subtype.
    pub const fn code(self) -> u8 {
        match self {
            Self::Original => 0,
            Self::Comment => 1,
            Self::Repost => 6,
            Self::Quote => 7,
        }
    }
}

/// A subtype code that does not map to any [`PostSubtype`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown post subtype code: {0}")]
pub struct UnknownSubtype(pub u8);

impl TryFrom<u8> for PostSubtype {
    type Error = UnknownSubtype;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Original),
            1 => Ok(Self::Comment),
            6 => Ok(Self::Repost),
            7 => Ok(Self::Quote),
            other => Err(UnknownSubtype(other)),
        }
    }
}

impl From<PostSubtype> for u8 {
    fn from(subtype: PostSubtype) -> Self {
        subtype.code()
    }
}

// ---------------------------------------------------------------------------
// Entity kinds
// ---------------------------------------------------------------------------

/// The four entity kinds held in the graph view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A [`User`](crate::User) node.
    User,
    /// A [`Post`](crate::Post) node.
    Post,
    /// A [`FollowEdge`](crate::FollowEdge) relation.
    Follow,
    /// A [`LikeEdge`](crate::LikeEdge) relation.
    Like,
}

impl EntityKind {
    /// Stable lowercase name, used in storage keys and log fields.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Post => "post",
            Self::Follow => "follow",
            Self::Like => "like",
        }
    }
}

impl core::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
