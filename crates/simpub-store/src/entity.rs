//! Binding between entity structs and their storage identity.

use serde::Serialize;
use serde::de::DeserializeOwned;

use simpub_types::{
    EntityKind, FollowEdge, FollowKey, LikeEdge, LikeKey, Post, PostId, User, UserId,
};

/// An entity that can be kept in an [`EntityStore`](crate::EntityStore).
///
/// Each kind lives in its own key space. Node keys are stored in their
/// [`Display`](core::fmt::Display) form; relation keys override
/// [`Entity::storage_key`] with their length-prefixed encoding.
pub trait Entity: Serialize + DeserializeOwned {
    /// The key space this entity lives in.
    const KIND: EntityKind;

    /// Typed identity of the entity.
    type Key: core::fmt::Display;

    /// The identity of this instance.
    fn key(&self) -> Self::Key;

    /// The string key a backend stores this identity under.
    fn storage_key(key: &Self::Key) -> String {
        key.to_string()
    }
}

impl Entity for User {
    const KIND: EntityKind = EntityKind::User;
    type Key = UserId;

    fn key(&self) -> UserId {
        self.id.clone()
    }
}

impl Entity for Post {
    const KIND: EntityKind = EntityKind::Post;
    type Key = PostId;

    fn key(&self) -> PostId {
        self.id.clone()
    }
}

impl Entity for FollowEdge {
    const KIND: EntityKind = EntityKind::Follow;
    type Key = FollowKey;

    fn key(&self) -> FollowKey {
        FollowKey::new(&self.followee, &self.follower)
    }

    fn storage_key(key: &FollowKey) -> String {
        key.storage_key()
    }
}

impl Entity for LikeEdge {
    const KIND: EntityKind = EntityKind::Like;
    type Key = LikeKey;

    fn key(&self) -> LikeKey {
        LikeKey::new(&self.user, &self.post)
    }

    fn storage_key(key: &LikeKey) -> String {
        key.storage_key()
    }
}
