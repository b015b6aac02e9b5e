//! The graph projector: one state transition per event kind.
//!
//! Each handler loads what it needs through the [`EntityStore`], decides
//! whether the event applies, and writes the result back. Nothing is kept
//! between invocations except what the store holds, so replaying a log
//! against an empty store always rebuilds the same view.
//!
//! Handlers never fail on missing or malformed input. A reference to an
//! unknown user or post, a fake post id, or a replayed creation all come
//! back as [`ApplyOutcome::Skipped`]. Errors are reserved for store
//! failures and counters that would leave their range.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use simpub_store::EntityStore;
use simpub_types::{
    EventKind, FollowEdge, FollowKey, LikeEdge, LikeKey, Post, PostId, PostOrigin, SocialEvent,
    User, UserId,
};

use crate::config::{ProjectorConfig, ReplayMode};
use crate::counters::{decrement, increment};
use crate::error::ProjectionError;
use crate::guards;
use crate::outcome::{ApplyOutcome, SkipReason};

// ---------------------------------------------------------------------------
// Derived posts
// ---------------------------------------------------------------------------

/// The three post kinds that point back at an origin post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DerivedKind {
    Repost,
    Quote,
    Comment,
}

impl DerivedKind {
    fn origin(self, id: PostId) -> PostOrigin {
        match self {
            Self::Repost => PostOrigin::Repost(id),
            Self::Quote => PostOrigin::Quote(id),
            Self::Comment => PostOrigin::Comment(id),
        }
    }

    /// Bump the origin's counter. Reposts and quotes share `repost_count`.
    fn bump_origin(self, origin: &mut Post) -> Result<(), ProjectionError> {
        match self {
            Self::Repost | Self::Quote => {
                origin.repost_count =
                    increment(origin.repost_count, "repost_count", origin.id.as_str())?;
            }
            Self::Comment => {
                origin.comments_count =
                    increment(origin.comments_count, "comments_count", origin.id.as_str())?;
            }
        }
        Ok(())
    }

    /// Bump the author's counter. Reposts and quotes share `reposts_count`.
    fn bump_author(self, author: &mut User) -> Result<(), ProjectionError> {
        match self {
            Self::Repost | Self::Quote => {
                author.reposts_count =
                    increment(author.reposts_count, "reposts_count", author.id.as_str())?;
            }
            Self::Comment => {
                author.comments_count =
                    increment(author.comments_count, "comments_count", author.id.as_str())?;
            }
        }
        Ok(())
    }
}

/// Parameters shared by repost, quote, and comment events.
struct DerivedParams<'a> {
    kind: DerivedKind,
    origin: &'a PostId,
    user: &'a UserId,
    new_post: &'a PostId,
    timestamp: u64,
    burn: Decimal,
}

// ---------------------------------------------------------------------------
// GraphProjector
// ---------------------------------------------------------------------------

/// Projects social events into Users, Posts, `FollowEdge`s and `LikeEdge`s.
///
/// The projector is the only writer of its store. Events must be handed
/// over one at a time, in log order.
#[derive(Debug)]
pub struct GraphProjector<S> {
    store: S,
    config: ProjectorConfig,
}

impl<S: EntityStore> GraphProjector<S> {
    /// Create a projector with the default (idempotent) configuration.
    pub fn new(store: S) -> Self {
        Self::with_config(store, ProjectorConfig::default())
    }

    /// Create a projector with an explicit configuration.
    pub const fn with_config(store: S, config: ProjectorConfig) -> Self {
        Self { store, config }
    }

    /// The backing store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Give up the projector and return its store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// The active configuration.
    pub const fn config(&self) -> ProjectorConfig {
        self.config
    }

    const fn is_legacy(&self) -> bool {
        matches!(self.config.replay_mode, ReplayMode::Legacy)
    }

    /// Apply one event.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError`] if the store fails or a counter would
    /// leave its range. Missing references are not errors.
    pub fn handle(&mut self, event: &SocialEvent) -> Result<ApplyOutcome, ProjectionError> {
        let timestamp = event.timestamp;
        let outcome = match &event.kind {
            EventKind::Follow { followee, follower } => {
                self.handle_follow(followee, follower, timestamp)
            }
            EventKind::UnFollow {
                followee,
                unfollower,
            } => self.handle_unfollow(followee, unfollower, timestamp),
            EventKind::Like { post, user } => self.handle_like(post, user, timestamp),
            EventKind::UnLike { post, user } => self.handle_unlike(post, user, timestamp),
            EventKind::NewPost { post, author, burn } => {
                self.handle_new_post(post, author, timestamp, *burn)
            }
            EventKind::Repost {
                origin,
                user,
                new_post,
                burn,
            } => self.handle_repost(origin, user, new_post, timestamp, *burn),
            EventKind::Quote {
                origin,
                user,
                new_post,
                burn,
            } => self.handle_quote(origin, user, new_post, timestamp, *burn),
            EventKind::Comment {
                origin,
                user,
                new_post,
                burn,
            } => self.handle_comment(origin, user, new_post, timestamp, *burn),
        }?;

        match outcome {
            ApplyOutcome::Applied => {
                debug!(event = event.kind.name(), timestamp, "Event applied");
            }
            ApplyOutcome::Skipped(reason) => {
                debug!(event = event.kind.name(), timestamp, %reason, "Event skipped");
            }
        }
        Ok(outcome)
    }

    // =================================================================
    // Follow relations
    // =================================================================

    /// `follower` starts following `followee`.
    ///
    /// Both users are created if missing. A second Follow for the same pair
    /// is skipped before anything is written; in [`ReplayMode::Legacy`] the
    /// adjacency lists and counters grow first and only the edge is
    /// deduplicated.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError`] on store failure or counter overflow.
    pub fn handle_follow(
        &mut self,
        followee: &UserId,
        follower: &UserId,
        timestamp: u64,
    ) -> Result<ApplyOutcome, ProjectionError> {
        let key = FollowKey::new(followee, follower);
        if !self.is_legacy() && guards::follow_exists(&self.store, &key)? {
            return Ok(ApplyOutcome::Skipped(SkipReason::DuplicateEdge));
        }

        let mut pair = guards::load_or_create_pair(&self.store, followee, follower)?;
        pair.link()?;
        pair.save(&mut self.store)?;

        if self.is_legacy() && guards::follow_exists(&self.store, &key)? {
            return Ok(ApplyOutcome::Skipped(SkipReason::DuplicateEdge));
        }

        self.store.upsert(&FollowEdge {
            followee: followee.clone(),
            follower: follower.clone(),
            timestamp,
        })?;
        Ok(ApplyOutcome::Applied)
    }

    /// `unfollower` stops following `followee`.
    ///
    /// Skipped unless both users and the edge exist. Both adjacency entries
    /// are located before anything changes; if either is missing nothing is
    /// written (in [`ReplayMode::Legacy`] the edge is still removed).
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError`] on store failure or counter underflow.
    pub fn handle_unfollow(
        &mut self,
        followee: &UserId,
        unfollower: &UserId,
        _timestamp: u64,
    ) -> Result<ApplyOutcome, ProjectionError> {
        let Some(mut pair) = guards::load_existing_pair(&self.store, followee, unfollower)? else {
            return Ok(ApplyOutcome::Skipped(SkipReason::MissingUser));
        };

        let key = FollowKey::new(followee, unfollower);
        if !guards::follow_exists(&self.store, &key)? {
            return Ok(ApplyOutcome::Skipped(SkipReason::MissingEdge));
        }

        let Some(positions) = pair.positions() else {
            warn!(
                followee = %followee,
                follower = %unfollower,
                "Follow edge has no matching adjacency entries"
            );
            if self.is_legacy() {
                self.store.remove::<FollowEdge>(&key)?;
            }
            return Ok(ApplyOutcome::Skipped(SkipReason::AdjacencyMismatch));
        };

        pair.unlink(positions)?;
        self.store.remove::<FollowEdge>(&key)?;
        pair.save(&mut self.store)?;
        Ok(ApplyOutcome::Applied)
    }

    // =================================================================
    // Like relations
    // =================================================================

    /// `user` likes `post`.
    ///
    /// Skipped if the post does not exist. The liking user is created if
    /// missing. Re-liking an already liked post only refreshes the edge's
    /// timestamp; in [`ReplayMode::Legacy`] both like counters grow again.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError`] on store failure or counter overflow.
    pub fn handle_like(
        &mut self,
        post: &PostId,
        user: &UserId,
        timestamp: u64,
    ) -> Result<ApplyOutcome, ProjectionError> {
        let Some(mut liked) = guards::load_post(&self.store, post)? else {
            return Ok(ApplyOutcome::Skipped(SkipReason::MissingPost));
        };

        let edge = LikeEdge {
            user: user.clone(),
            post: post.clone(),
            timestamp,
        };
        let already_liked = guards::like_exists(&self.store, &LikeKey::new(user, post))?;
        if already_liked && !self.is_legacy() {
            self.store.upsert(&edge)?;
            return Ok(ApplyOutcome::Applied);
        }

        liked.likes_count = increment(liked.likes_count, "likes_count", liked.id.as_str())?;
        let mut liker = guards::load_or_create_user(&self.store, user)?;
        liker.likes_count = increment(liker.likes_count, "likes_count", liker.id.as_str())?;

        self.store.upsert(&liked)?;
        self.store.upsert(&edge)?;
        self.store.upsert(&liker)?;
        Ok(ApplyOutcome::Applied)
    }

    /// `user` withdraws a like of `post`.
    ///
    /// Skipped unless the post, the user, and the like all exist.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError`] on store failure or counter underflow.
    pub fn handle_unlike(
        &mut self,
        post: &PostId,
        user: &UserId,
        _timestamp: u64,
    ) -> Result<ApplyOutcome, ProjectionError> {
        let Some(mut liked) = guards::load_post(&self.store, post)? else {
            return Ok(ApplyOutcome::Skipped(SkipReason::MissingPost));
        };
        let Some(mut liker) = guards::load_user(&self.store, user)? else {
            return Ok(ApplyOutcome::Skipped(SkipReason::MissingUser));
        };
        let key = LikeKey::new(user, post);
        if !guards::like_exists(&self.store, &key)? {
            return Ok(ApplyOutcome::Skipped(SkipReason::MissingEdge));
        }

        liked.likes_count = decrement(liked.likes_count, "likes_count", liked.id.as_str())?;
        liker.likes_count = decrement(liker.likes_count, "likes_count", liker.id.as_str())?;

        self.store.upsert(&liked)?;
        self.store.upsert(&liker)?;
        self.store.remove::<LikeEdge>(&key)?;
        Ok(ApplyOutcome::Applied)
    }

    // =================================================================
    // Posts
    // =================================================================

    /// `author` publishes an original post.
    ///
    /// Skipped if the id is malformed or already taken.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError`] on store failure or counter overflow.
    pub fn handle_new_post(
        &mut self,
        post: &PostId,
        author: &UserId,
        timestamp: u64,
        burn: Decimal,
    ) -> Result<ApplyOutcome, ProjectionError> {
        if !post.is_well_formed() {
            return Ok(ApplyOutcome::Skipped(SkipReason::InvalidPostId));
        }
        if guards::post_exists(&self.store, post)? {
            return Ok(ApplyOutcome::Skipped(SkipReason::DuplicatePost));
        }

        let mut writer = guards::load_or_create_user(&self.store, author)?;
        writer.posts_count = increment(writer.posts_count, "posts_count", writer.id.as_str())?;
        writer.touch_post_update(timestamp);

        self.store
            .upsert(&Post::original(post.clone(), author.clone(), timestamp, burn))?;
        self.store.upsert(&writer)?;
        Ok(ApplyOutcome::Applied)
    }

    /// `user` reposts `origin` as `new_post`.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError`] on store failure or counter overflow.
    pub fn handle_repost(
        &mut self,
        origin: &PostId,
        user: &UserId,
        new_post: &PostId,
        timestamp: u64,
        burn: Decimal,
    ) -> Result<ApplyOutcome, ProjectionError> {
        self.handle_derived(&DerivedParams {
            kind: DerivedKind::Repost,
            origin,
            user,
            new_post,
            timestamp,
            burn,
        })
    }

    /// `user` quotes `origin` as `new_post`.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError`] on store failure or counter overflow.
    pub fn handle_quote(
        &mut self,
        origin: &PostId,
        user: &UserId,
        new_post: &PostId,
        timestamp: u64,
        burn: Decimal,
    ) -> Result<ApplyOutcome, ProjectionError> {
        self.handle_derived(&DerivedParams {
            kind: DerivedKind::Quote,
            origin,
            user,
            new_post,
            timestamp,
            burn,
        })
    }

    /// `user` comments on `origin` with `new_post`.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError`] on store failure or counter overflow.
    pub fn handle_comment(
        &mut self,
        origin: &PostId,
        user: &UserId,
        new_post: &PostId,
        timestamp: u64,
        burn: Decimal,
    ) -> Result<ApplyOutcome, ProjectionError> {
        self.handle_derived(&DerivedParams {
            kind: DerivedKind::Comment,
            origin,
            user,
            new_post,
            timestamp,
            burn,
        })
    }

    /// Shared transition for reposts, quotes, and comments.
    ///
    /// Skipped if the origin is missing, either id is malformed, or the new
    /// id is taken. A taken id is detected before the origin is touched;
    /// in [`ReplayMode::Legacy`] the origin counter is bumped first and the
    /// bump is kept.
    fn handle_derived(
        &mut self,
        params: &DerivedParams<'_>,
    ) -> Result<ApplyOutcome, ProjectionError> {
        let Some(mut origin) = guards::load_post(&self.store, params.origin)? else {
            return Ok(ApplyOutcome::Skipped(SkipReason::MissingOrigin));
        };
        if !params.origin.is_well_formed() || !params.new_post.is_well_formed() {
            return Ok(ApplyOutcome::Skipped(SkipReason::InvalidPostId));
        }

        let taken = guards::post_exists(&self.store, params.new_post)?;
        if taken && !self.is_legacy() {
            return Ok(ApplyOutcome::Skipped(SkipReason::DuplicatePost));
        }

        params.kind.bump_origin(&mut origin)?;
        self.store.upsert(&origin)?;
        if taken {
            return Ok(ApplyOutcome::Skipped(SkipReason::DuplicatePost));
        }

        let mut writer = guards::load_or_create_user(&self.store, params.user)?;
        params.kind.bump_author(&mut writer)?;
        writer.touch_post_update(params.timestamp);
        self.store.upsert(&writer)?;

        self.store.upsert(&Post::derived(
            params.new_post.clone(),
            params.user.clone(),
            params.kind.origin(params.origin.clone()),
            params.timestamp,
            params.burn,
        ))?;
        Ok(ApplyOutcome::Applied)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rust_decimal_macros::dec;
    use simpub_store::{GraphSnapshot, MemoryStore};
    use simpub_types::PostSubtype;

    use super::*;

    fn pid(tag: char) -> PostId {
        PostId::new(format!("Qm{}", tag.to_string().repeat(44)))
    }

    fn uid(addr: &str) -> UserId {
        UserId::new(addr)
    }

    fn projector() -> GraphProjector<MemoryStore> {
        GraphProjector::new(MemoryStore::new())
    }

    fn legacy() -> GraphProjector<MemoryStore> {
        GraphProjector::with_config(
            MemoryStore::new(),
            ProjectorConfig {
                replay_mode: ReplayMode::Legacy,
            },
        )
    }

    fn view(projector: &GraphProjector<MemoryStore>) -> GraphSnapshot {
        projector.store().snapshot().unwrap()
    }

    fn user<'a>(snapshot: &'a GraphSnapshot, addr: &str) -> &'a User {
        snapshot.user(&uid(addr)).unwrap()
    }

    // --- follow ---

    #[test]
    fn follow_creates_users_and_edge() {
        let mut p = projector();
        let outcome = p.handle_follow(&uid("0xa"), &uid("0xb"), 5).unwrap();
        assert_eq!(outcome, ApplyOutcome::Applied);

        let v = view(&p);
        assert_eq!(user(&v, "0xa").followers, vec![uid("0xb")]);
        assert_eq!(user(&v, "0xa").followers_count, 1);
        assert_eq!(user(&v, "0xb").followees, vec![uid("0xa")]);
        assert_eq!(user(&v, "0xb").followees_count, 1);
        let edge = v.follow(&FollowKey::new(&uid("0xa"), &uid("0xb"))).unwrap();
        assert_eq!(edge.timestamp, 5);
    }

    #[test]
    fn duplicate_follow_is_a_no_op() {
        let mut p = projector();
        p.handle_follow(&uid("0xa"), &uid("0xb"), 1).unwrap();
        let outcome = p.handle_follow(&uid("0xa"), &uid("0xb"), 2).unwrap();
        assert_eq!(outcome, ApplyOutcome::Skipped(SkipReason::DuplicateEdge));

        let v = view(&p);
        assert_eq!(user(&v, "0xa").followers_count, 1);
        assert_eq!(user(&v, "0xb").followees_count, 1);
        assert_eq!(v.follows.len(), 1);
        assert_eq!(v.follows[0].timestamp, 1);
    }

    #[test]
    fn legacy_duplicate_follow_inflates_counters() {
        let mut p = legacy();
        assert_eq!(p.config().replay_mode, ReplayMode::Legacy);
        p.handle_follow(&uid("0xa"), &uid("0xb"), 1).unwrap();
        let outcome = p.handle_follow(&uid("0xa"), &uid("0xb"), 2).unwrap();
        assert_eq!(outcome, ApplyOutcome::Skipped(SkipReason::DuplicateEdge));

        let v = view(&p);
        assert_eq!(user(&v, "0xa").followers_count, 2);
        assert_eq!(user(&v, "0xa").followers.len(), 2);
        assert_eq!(user(&v, "0xb").followees_count, 2);
        assert_eq!(v.follows.len(), 1);
    }

    #[test]
    fn self_follow_keeps_both_lists() {
        let mut p = projector();
        p.handle_follow(&uid("0xa"), &uid("0xa"), 1).unwrap();

        let v = view(&p);
        let a = user(&v, "0xa");
        assert_eq!(a.followers, vec![uid("0xa")]);
        assert_eq!(a.followees, vec![uid("0xa")]);

        assert_eq!(
            p.handle_unfollow(&uid("0xa"), &uid("0xa"), 2).unwrap(),
            ApplyOutcome::Applied
        );
        let v = view(&p);
        let a = user(&v, "0xa");
        assert!(a.followers.is_empty());
        assert!(a.followees.is_empty());
        assert_eq!(a.followers_count, 0);
        assert_eq!(a.followees_count, 0);
    }

    #[test]
    fn follows_with_colons_in_ids_stay_distinct() {
        let mut p = projector();
        let first = p.handle_follow(&uid("0xb"), &uid("0xa:"), 1).unwrap();
        let second = p.handle_follow(&uid(":0xb"), &uid("0xa"), 2).unwrap();
        assert_eq!(first, ApplyOutcome::Applied);
        assert_eq!(second, ApplyOutcome::Applied);

        let v = view(&p);
        assert_eq!(v.follows.len(), 2);
        assert_eq!(user(&v, ":0xb").followers, vec![uid("0xa")]);
    }

    // --- unfollow ---

    #[test]
    fn unfollow_of_unknown_users_is_skipped() {
        let mut p = projector();
        let outcome = p.handle_unfollow(&uid("0xa"), &uid("0xb"), 1).unwrap();
        assert_eq!(outcome, ApplyOutcome::Skipped(SkipReason::MissingUser));
        assert!(p.store().is_empty());
    }

    #[test]
    fn unfollow_without_edge_leaves_users_untouched() {
        let mut p = projector();
        p.handle_follow(&uid("0xa"), &uid("0xc"), 1).unwrap();
        p.handle_follow(&uid("0xb"), &uid("0xc"), 1).unwrap();
        let before = view(&p);

        let outcome = p.handle_unfollow(&uid("0xa"), &uid("0xb"), 2).unwrap();
        assert_eq!(outcome, ApplyOutcome::Skipped(SkipReason::MissingEdge));
        assert_eq!(view(&p), before);
    }

    #[test]
    fn unfollow_swap_removes_from_middle() {
        let mut p = projector();
        for follower in ["0xb", "0xc", "0xd"] {
            p.handle_follow(&uid("0xa"), &uid(follower), 1).unwrap();
        }
        p.handle_unfollow(&uid("0xa"), &uid("0xb"), 2).unwrap();

        let v = view(&p);
        assert_eq!(user(&v, "0xa").followers, vec![uid("0xd"), uid("0xc")]);
        assert_eq!(user(&v, "0xa").followers_count, 2);
        assert!(user(&v, "0xb").followees.is_empty());
    }

    #[test]
    fn unfollow_with_broken_adjacency_changes_nothing() {
        let mut store = MemoryStore::new();
        store.upsert(&User::new(uid("0xa"))).unwrap();
        store.upsert(&User::new(uid("0xb"))).unwrap();
        store
            .upsert(&FollowEdge {
                followee: uid("0xa"),
                follower: uid("0xb"),
                timestamp: 1,
            })
            .unwrap();
        let mut p = GraphProjector::new(store);
        let before = view(&p);

        let outcome = p.handle_unfollow(&uid("0xa"), &uid("0xb"), 2).unwrap();
        assert_eq!(outcome, ApplyOutcome::Skipped(SkipReason::AdjacencyMismatch));
        assert_eq!(view(&p), before);
    }

    #[test]
    fn legacy_unfollow_with_broken_adjacency_drops_only_the_edge() {
        let mut store = MemoryStore::new();
        store.upsert(&User::new(uid("0xa"))).unwrap();
        store.upsert(&User::new(uid("0xb"))).unwrap();
        store
            .upsert(&FollowEdge {
                followee: uid("0xa"),
                follower: uid("0xb"),
                timestamp: 1,
            })
            .unwrap();
        let mut p = GraphProjector::with_config(
            store,
            ProjectorConfig {
                replay_mode: ReplayMode::Legacy,
            },
        );
        let before = view(&p);

        let outcome = p.handle_unfollow(&uid("0xa"), &uid("0xb"), 2).unwrap();
        assert_eq!(outcome, ApplyOutcome::Skipped(SkipReason::AdjacencyMismatch));
        let after = view(&p);
        assert!(after.follows.is_empty());
        assert_eq!(after.users, before.users);
    }

    // --- like ---

    #[test]
    fn like_of_unknown_post_is_skipped() {
        let mut p = projector();
        let outcome = p.handle_like(&pid('P'), &uid("0xa"), 1).unwrap();
        assert_eq!(outcome, ApplyOutcome::Skipped(SkipReason::MissingPost));
        assert!(p.store().is_empty());
    }

    #[test]
    fn relike_only_refreshes_timestamp() {
        let mut p = projector();
        p.handle_new_post(&pid('P'), &uid("0xa"), 1, Decimal::ZERO).unwrap();
        p.handle_like(&pid('P'), &uid("0xb"), 2).unwrap();
        p.handle_like(&pid('P'), &uid("0xb"), 3).unwrap();

        let v = view(&p);
        assert_eq!(v.post(&pid('P')).unwrap().likes_count, 1);
        assert_eq!(user(&v, "0xb").likes_count, 1);
        let edge = v.like(&LikeKey::new(&uid("0xb"), &pid('P'))).unwrap();
        assert_eq!(edge.timestamp, 3);
    }

    #[test]
    fn legacy_relike_double_counts() {
        let mut p = legacy();
        p.handle_new_post(&pid('P'), &uid("0xa"), 1, Decimal::ZERO).unwrap();
        p.handle_like(&pid('P'), &uid("0xb"), 2).unwrap();
        p.handle_like(&pid('P'), &uid("0xb"), 3).unwrap();

        let v = view(&p);
        assert_eq!(v.post(&pid('P')).unwrap().likes_count, 2);
        assert_eq!(user(&v, "0xb").likes_count, 2);
        assert_eq!(v.likes.len(), 1);
    }

    #[test]
    fn unlike_without_like_is_skipped() {
        let mut p = projector();
        p.handle_new_post(&pid('P'), &uid("0xa"), 1, Decimal::ZERO).unwrap();
        let outcome = p.handle_unlike(&pid('P'), &uid("0xa"), 2).unwrap();
        assert_eq!(outcome, ApplyOutcome::Skipped(SkipReason::MissingEdge));
        assert_eq!(view(&p).post(&pid('P')).unwrap().likes_count, 0);
    }

    // --- posts ---

    #[test]
    fn new_post_records_author_activity() {
        let mut p = projector();
        p.handle_new_post(&pid('P'), &uid("0xa"), 9, dec!(3.5)).unwrap();

        let v = view(&p);
        let post = v.post(&pid('P')).unwrap();
        assert_eq!(post.subtype, PostSubtype::Original);
        assert_eq!(post.author, uid("0xa"));
        assert_eq!(post.burn_amount, dec!(3.5));
        assert_eq!(user(&v, "0xa").posts_count, 1);
        assert_eq!(user(&v, "0xa").last_post_update, 9);
    }

    #[test]
    fn malformed_post_id_is_rejected() {
        let mut p = projector();
        let outcome = p
            .handle_new_post(&PostId::new("QmTooShort"), &uid("0xa"), 1, Decimal::ZERO)
            .unwrap();
        assert_eq!(outcome, ApplyOutcome::Skipped(SkipReason::InvalidPostId));
        assert!(p.store().is_empty());
    }

    #[test]
    fn repost_and_quote_share_origin_counter() {
        let mut p = projector();
        p.handle_new_post(&pid('P'), &uid("0xa"), 1, Decimal::ZERO).unwrap();
        p.handle_repost(&pid('P'), &uid("0xb"), &pid('R'), 2, Decimal::ZERO)
            .unwrap();
        p.handle_quote(&pid('P'), &uid("0xb"), &pid('Q'), 3, Decimal::ZERO)
            .unwrap();

        let v = view(&p);
        assert_eq!(v.post(&pid('P')).unwrap().repost_count, 2);
        assert_eq!(v.post(&pid('R')).unwrap().subtype, PostSubtype::Repost);
        assert_eq!(v.post(&pid('R')).unwrap().repost_origin_id(), Some(&pid('P')));
        assert_eq!(v.post(&pid('Q')).unwrap().quote_origin_id(), Some(&pid('P')));
        assert_eq!(user(&v, "0xb").reposts_count, 2);
        assert_eq!(user(&v, "0xb").last_post_update, 3);
    }

    #[test]
    fn derived_post_needs_existing_origin() {
        let mut p = projector();
        let outcome = p
            .handle_comment(&pid('P'), &uid("0xb"), &pid('C'), 2, Decimal::ZERO)
            .unwrap();
        assert_eq!(outcome, ApplyOutcome::Skipped(SkipReason::MissingOrigin));
        assert!(p.store().is_empty());
    }

    #[test]
    fn derived_post_with_malformed_new_id_is_rejected() {
        let mut p = projector();
        p.handle_new_post(&pid('P'), &uid("0xa"), 1, Decimal::ZERO).unwrap();
        let outcome = p
            .handle_repost(&pid('P'), &uid("0xb"), &PostId::new("fake"), 2, Decimal::ZERO)
            .unwrap();
        assert_eq!(outcome, ApplyOutcome::Skipped(SkipReason::InvalidPostId));
        assert_eq!(view(&p).post(&pid('P')).unwrap().repost_count, 0);
    }

    #[test]
    fn duplicate_comment_leaves_origin_alone() {
        let mut p = projector();
        p.handle_new_post(&pid('P'), &uid("0xa"), 1, Decimal::ZERO).unwrap();
        p.handle_comment(&pid('P'), &uid("0xb"), &pid('C'), 2, Decimal::ZERO)
            .unwrap();
        let outcome = p
            .handle_comment(&pid('P'), &uid("0xb"), &pid('C'), 2, Decimal::ZERO)
            .unwrap();
        assert_eq!(outcome, ApplyOutcome::Skipped(SkipReason::DuplicatePost));

        let v = view(&p);
        assert_eq!(v.post(&pid('P')).unwrap().comments_count, 1);
        assert_eq!(user(&v, "0xb").comments_count, 1);
    }

    #[test]
    fn legacy_duplicate_comment_keeps_origin_bump() {
        let mut p = legacy();
        p.handle_new_post(&pid('P'), &uid("0xa"), 1, Decimal::ZERO).unwrap();
        p.handle_comment(&pid('P'), &uid("0xb"), &pid('C'), 2, Decimal::ZERO)
            .unwrap();
        let outcome = p
            .handle_comment(&pid('P'), &uid("0xb"), &pid('C'), 2, Decimal::ZERO)
            .unwrap();
        assert_eq!(outcome, ApplyOutcome::Skipped(SkipReason::DuplicatePost));

        let v = view(&p);
        assert_eq!(v.post(&pid('P')).unwrap().comments_count, 2);
        assert_eq!(user(&v, "0xb").comments_count, 1);
    }

    #[test]
    fn handle_dispatches_by_kind() {
        let mut p = projector();
        let event = SocialEvent::new(
            4,
            EventKind::NewPost {
                post: pid('P'),
                author: uid("0xa"),
                burn: Decimal::ONE,
            },
        );
        assert!(p.handle(&event).unwrap().is_applied());
        assert_eq!(
            p.handle(&event).unwrap(),
            ApplyOutcome::Skipped(SkipReason::DuplicatePost)
        );
    }
}
