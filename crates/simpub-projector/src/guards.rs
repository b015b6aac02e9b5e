//! Existence guards and lazy creation, one place per entity kind.
//!
//! At-least-once delivery means any event may be a replay, and an
//! untrusted producer means any reference may be fake. Handlers answer both
//! with existence checks; these helpers are the only way they ask.

use simpub_store::{EntityStore, StoreError};
use simpub_types::{FollowEdge, FollowKey, LikeEdge, LikeKey, Post, PostId, User, UserId};

use crate::adjacency::FollowPair;

/// Load a user, or materialize one in the canonical default state.
///
/// The new user is not written; the caller persists it with its changes.
pub(crate) fn load_or_create_user<S: EntityStore>(
    store: &S,
    id: &UserId,
) -> Result<User, StoreError> {
    Ok(store
        .load::<User>(id)?
        .unwrap_or_else(|| User::new(id.clone())))
}

pub(crate) fn load_user<S: EntityStore>(
    store: &S,
    id: &UserId,
) -> Result<Option<User>, StoreError> {
    store.load::<User>(id)
}

pub(crate) fn load_post<S: EntityStore>(
    store: &S,
    id: &PostId,
) -> Result<Option<Post>, StoreError> {
    store.load::<Post>(id)
}

pub(crate) fn post_exists<S: EntityStore>(store: &S, id: &PostId) -> Result<bool, StoreError> {
    store.exists::<Post>(id)
}

pub(crate) fn follow_exists<S: EntityStore>(
    store: &S,
    key: &FollowKey,
) -> Result<bool, StoreError> {
    store.exists::<FollowEdge>(key)
}

pub(crate) fn like_exists<S: EntityStore>(store: &S, key: &LikeKey) -> Result<bool, StoreError> {
    store.exists::<LikeEdge>(key)
}

/// Both users of a follow, creating whichever is missing.
pub(crate) fn load_or_create_pair<S: EntityStore>(
    store: &S,
    followee: &UserId,
    follower: &UserId,
) -> Result<FollowPair, StoreError> {
    let followee_user = load_or_create_user(store, followee)?;
    let follower_user = if follower == followee {
        followee_user.clone()
    } else {
        load_or_create_user(store, follower)?
    };
    Ok(FollowPair::new(followee_user, follower_user))
}

/// Both users of a follow, or `None` if either is missing.
pub(crate) fn load_existing_pair<S: EntityStore>(
    store: &S,
    followee: &UserId,
    follower: &UserId,
) -> Result<Option<FollowPair>, StoreError> {
    let Some(followee_user) = load_user(store, followee)? else {
        return Ok(None);
    };
    let follower_user = if follower == followee {
        followee_user.clone()
    } else {
        let Some(user) = load_user(store, follower)? else {
            return Ok(None);
        };
        user
    };
    Ok(Some(FollowPair::new(followee_user, follower_user)))
}
