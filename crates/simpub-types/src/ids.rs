//! Type-safe identifier wrappers around externally supplied strings.
//!
//! Users are keyed by their wallet address (hex) and posts by a
//! content-addressed identifier. Both arrive from an untrusted producer, so
//! the wrappers only normalize; the shape check for post ids lives in
//! [`is_valid_post_id`] and is applied by the handlers that create posts.
//!
//! Relation entities use tuple keys ([`FollowKey`], [`LikeKey`]) rather than
//! bare string concatenation. Ids are not validated, so any character may
//! appear in either part. The storage form therefore prefixes the first part
//! with its byte length (`3:0xa:0xb`), which fixes where the first part ends
//! and keeps two different pairs from ever sharing a key. `Display` is the
//! plain `a:b` form for logs.

use serde::{Deserialize, Serialize};

/// Prefix every content-addressed post id starts with.
pub const POST_ID_PREFIX: &str = "Qm";

/// Exact length, in bytes, of a content-addressed post id.
pub const POST_ID_LEN: usize = 46;

/// Separator between the parts of a composite storage key.
pub const KEY_SEPARATOR: char = ':';

/// Generates a newtype wrapper around [`String`] with standard derives.
///
/// The second argument is applied to every raw value on construction,
/// including values produced by deserialization.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident, $normalize:expr
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Build an identifier from its raw string form.
            pub fn new(raw: impl Into<String>) -> Self {
                Self::from(raw.into())
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Return the inner [`String`] value.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                let normalize: fn(String) -> String = $normalize;
                Self(normalize(raw))
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self::from(raw.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

define_id! {
    /// Wallet address of a user, normalized to lowercase hex.
    UserId, |raw| raw.to_ascii_lowercase()
}

define_id! {
    /// Content-addressed identifier of a post, kept exactly as supplied.
    PostId, |raw| raw
}

impl PostId {
    /// Whether this id has the shape of a content-addressed identifier.
    pub fn is_well_formed(&self) -> bool {
        is_valid_post_id(&self.0)
    }
}

/// Check the shape of a content-addressed post id.
///
/// True iff the id starts with [`POST_ID_PREFIX`] and is exactly
/// [`POST_ID_LEN`] bytes long. Well-formed ids are base58, so bytes and
/// characters agree on them; any non-ASCII character makes the byte length
/// overshoot and the id is rejected. The hash itself is not verified.
pub fn is_valid_post_id(id: &str) -> bool {
    id.starts_with(POST_ID_PREFIX) && id.len() == POST_ID_LEN
}

/// Length-prefixed join of a composite key's two parts.
fn composite_storage_key(first: &str, second: &str) -> String {
    format!("{}{KEY_SEPARATOR}{first}{KEY_SEPARATOR}{second}", first.len())
}

/// Key of a follow relation: `follower` follows `followee`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FollowKey {
    /// The user being followed.
    pub followee: UserId,
    /// The user doing the following.
    pub follower: UserId,
}

impl FollowKey {
    /// Build the key for a (followee, follower) pair.
    pub fn new(followee: &UserId, follower: &UserId) -> Self {
        Self {
            followee: followee.clone(),
            follower: follower.clone(),
        }
    }

    /// Collision-free storage form, see the module docs.
    pub fn storage_key(&self) -> String {
        composite_storage_key(self.followee.as_str(), self.follower.as_str())
    }
}

impl core::fmt::Display for FollowKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}{KEY_SEPARATOR}{}", self.followee, self.follower)
    }
}

/// Key of a like relation: `user` likes `post`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LikeKey {
    /// The liking user.
    pub user: UserId,
    /// The liked post.
    pub post: PostId,
}

impl LikeKey {
    /// Build the key for a (user, post) pair.
    pub fn new(user: &UserId, post: &PostId) -> Self {
        Self {
            user: user.clone(),
            post: post.clone(),
        }
    }

    /// Collision-free storage form, see the module docs.
    pub fn storage_key(&self) -> String {
        composite_storage_key(self.user.as_str(), self.post.as_str())
    }
}

impl core::fmt::Display for LikeKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}{KEY_SEPARATOR}{}", self.user, self.post)
    }
}
