//! Follow adjacency maintenance.
//!
//! A follow touches two users: the followee gains a follower and the
//! follower gains a followee. Each list is only ever mutated together with
//! its counter, so the two cannot drift. Removal swaps the last entry into
//! the vacated slot, which is O(1) and does not preserve order.
//!
//! A user may follow themself. Both sides are then the same entity, and
//! [`FollowPair`] holds a single instance so neither write clobbers the
//! other.

use simpub_store::{EntityStore, StoreError};
use simpub_types::{User, UserId};

use crate::counters::{decrement, increment};
use crate::error::ProjectionError;

/// Index of each side in the other's adjacency list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Positions {
    /// Index of the follower in `followee.followers`.
    in_followers: usize,
    /// Index of the followee in `follower.followees`.
    in_followees: usize,
}

/// The two users of a follow relation, loaded for one read-modify-write.
#[derive(Debug)]
pub(crate) struct FollowPair {
    followee: User,
    /// `None` when the follower is the followee.
    follower: Option<User>,
}

impl FollowPair {
    /// Pair two users. If both carry the same id, only `followee` is kept.
    pub(crate) fn new(followee: User, follower: User) -> Self {
        let follower = (follower.id != followee.id).then_some(follower);
        Self { followee, follower }
    }

    #[cfg(test)]
    const fn followee(&self) -> &User {
        &self.followee
    }

    pub(crate) const fn follower(&self) -> &User {
        match &self.follower {
            Some(follower) => follower,
            None => &self.followee,
        }
    }

    const fn follower_mut(&mut self) -> &mut User {
        match &mut self.follower {
            Some(follower) => follower,
            None => &mut self.followee,
        }
    }

    /// Append each side to the other's list and bump both counters.
    pub(crate) fn link(&mut self) -> Result<(), ProjectionError> {
        let followee_id = self.followee.id.clone();
        let follower_id = self.follower().id.clone();

        let followee = &mut self.followee;
        followee.followers_count =
            increment(followee.followers_count, "followers_count", followee.id.as_str())?;
        followee.followers.push(follower_id);

        let follower = self.follower_mut();
        follower.followees_count =
            increment(follower.followees_count, "followees_count", follower.id.as_str())?;
        follower.followees.push(followee_id);
        Ok(())
    }

    /// Locate both sides, or `None` if either list lacks its entry.
    pub(crate) fn positions(&self) -> Option<Positions> {
        let followee_id = &self.followee.id;
        let follower = self.follower();
        let in_followers = self
            .followee
            .followers
            .iter()
            .position(|id| *id == follower.id)?;
        let in_followees = follower
            .followees
            .iter()
            .position(|id| id == followee_id)?;
        Some(Positions {
            in_followers,
            in_followees,
        })
    }

    /// Remove both entries found by [`positions`](Self::positions) and
    /// decrement both counters.
    pub(crate) fn unlink(&mut self, positions: Positions) -> Result<(), ProjectionError> {
        let followee = &mut self.followee;
        detach(
            &mut followee.followers,
            &mut followee.followers_count,
            positions.in_followers,
            "followers_count",
            &followee.id,
        )?;

        let follower = self.follower_mut();
        detach(
            &mut follower.followees,
            &mut follower.followees_count,
            positions.in_followees,
            "followees_count",
            &follower.id,
        )
    }

    /// Persist both users (once, for a self-follow).
    pub(crate) fn save<S: EntityStore>(&self, store: &mut S) -> Result<(), StoreError> {
        store.upsert(&self.followee)?;
        if let Some(follower) = &self.follower {
            store.upsert(follower)?;
        }
        Ok(())
    }
}

/// Swap-remove `list[index]` and decrement its counter.
///
/// `index` must come from [`FollowPair::positions`] on the same, unmodified
/// list; a stale index is treated as a missing entry.
fn detach(
    list: &mut Vec<UserId>,
    count: &mut u64,
    index: usize,
    field: &'static str,
    owner: &UserId,
) -> Result<(), ProjectionError> {
    let next = decrement(*count, field, owner.as_str())?;
    if index < list.len() {
        list.swap_remove(index);
        *count = next;
    }
    Ok(())
}
