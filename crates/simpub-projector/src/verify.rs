//! Consistency verification for a materialized graph view.
//!
//! Every counter in the view is a denormalized summary of relations the
//! view also holds, so each one can be recomputed from scratch and
//! compared. The checks are:
//!
//! ```text
//! user.followers_count == len(user.followers)      (same for followees)
//! FollowEdge(a, b)  <=>  b in a.followers  and  a in b.followees
//! post.likes_count == |LikeEdge(_, post)|          (same per user)
//! post.comments_count == |comments of post|        (repost_count: reposts + quotes)
//! user.posts_count == |original posts authored|    (same for comments, reposts)
//! ```
//!
//! plus referential checks: likes and derived posts point at posts that
//! exist, and a post's subtype agrees with its origin reference.
//!
//! A view built in idempotent replay mode passes all of them. Legacy mode
//! double counts duplicate deliveries, which shows up here as counter drift.

use std::collections::BTreeMap;
use std::fmt;

use simpub_store::GraphSnapshot;
use simpub_types::{EntityKind, FollowKey, PostId, PostOrigin, PostSubtype, User, UserId};

/// The outcome of verifying one view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyResult {
    /// Every check passed.
    Consistent,
    /// One or more checks failed.
    Anomalies(Vec<ViewAnomaly>),
}

impl VerifyResult {
    /// Whether every check passed.
    pub const fn is_consistent(&self) -> bool {
        matches!(self, Self::Consistent)
    }

    /// The anomalies found, empty when consistent.
    pub fn anomalies(&self) -> &[ViewAnomaly] {
        match self {
            Self::Consistent => &[],
            Self::Anomalies(found) => found,
        }
    }
}

/// A single inconsistency in the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAnomaly {
    /// A stored counter disagrees with the value derived from relations.
    CounterMismatch {
        /// Kind of the entity owning the counter.
        kind: EntityKind,
        /// Key of the entity owning the counter.
        key: String,
        /// Name of the counter field.
        field: &'static str,
        /// Value held in the view.
        stored: u64,
        /// Value recomputed from relations.
        derived: u64,
    },
    /// An adjacency list names the same user more than once.
    DuplicateAdjacency {
        /// Owner of the list.
        user: UserId,
        /// `"followers"` or `"followees"`.
        list: &'static str,
        /// The repeated entry.
        entry: UserId,
    },
    /// A follow edge is missing from one or both adjacency lists.
    EdgeWithoutAdjacency {
        /// Key of the follow edge.
        key: FollowKey,
    },
    /// An adjacency entry has no follow edge behind it.
    AdjacencyWithoutEdge {
        /// Key of the follow edge that should exist.
        key: FollowKey,
    },
    /// A like edge references a post or user that does not exist.
    DanglingLike {
        /// The liking user.
        user: UserId,
        /// The liked post.
        post: PostId,
    },
    /// A derived post references an origin that does not exist.
    DanglingOrigin {
        /// The derived post.
        post: PostId,
        /// The missing origin.
        origin: PostId,
    },
    /// A post's subtype does not agree with its origin reference.
    SubtypeMismatch {
        /// The offending post.
        post: PostId,
        /// Subtype held in the view.
        stored: PostSubtype,
        /// Subtype implied by the origin reference.
        expected: PostSubtype,
    },
}

impl fmt::Display for ViewAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CounterMismatch {
                kind,
                key,
                field,
                stored,
                derived,
            } => write!(
                f,
                "{kind} {key}: {field} is {stored}, relations give {derived}"
            ),
            Self::DuplicateAdjacency { user, list, entry } => {
                write!(f, "user {user}: {list} lists {entry} more than once")
            }
            Self::EdgeWithoutAdjacency { key } => {
                write!(f, "follow {key}: missing from adjacency lists")
            }
            Self::AdjacencyWithoutEdge { key } => {
                write!(f, "follow {key}: listed in adjacency but no edge exists")
            }
            Self::DanglingLike { user, post } => {
                write!(f, "like {user}:{post}: references a missing entity")
            }
            Self::DanglingOrigin { post, origin } => {
                write!(f, "post {post}: origin {origin} does not exist")
            }
            Self::SubtypeMismatch {
                post,
                stored,
                expected,
            } => write!(
                f,
                "post {post}: subtype {} but origin implies {}",
                stored.code(),
                expected.code()
            ),
        }
    }
}

/// Per-entity tallies recomputed from relations.
#[derive(Debug, Default)]
struct Tally {
    likes: u64,
    comments: u64,
    reposts: u64,
    posts: u64,
}

fn bump(
    tallies: &mut BTreeMap<String, Tally>,
    key: &str,
    field: impl FnOnce(&mut Tally) -> &mut u64,
) {
    let tally = tallies.entry(key.to_owned()).or_default();
    let slot = field(tally);
    *slot = slot.saturating_add(1);
}

fn len_u64(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

/// Verify every consistency check over a snapshot of the view.
pub fn verify_view(view: &GraphSnapshot) -> VerifyResult {
    let mut anomalies = Vec::new();

    for user in view.users.values() {
        check_adjacency_lengths(user, &mut anomalies);
        check_adjacency_duplicates(user, &mut anomalies);
    }
    check_follow_edges(view, &mut anomalies);
    check_posts(view, &mut anomalies);

    if anomalies.is_empty() {
        VerifyResult::Consistent
    } else {
        VerifyResult::Anomalies(anomalies)
    }
}

fn mismatch(
    kind: EntityKind,
    key: &str,
    field: &'static str,
    stored: u64,
    derived: u64,
) -> Option<ViewAnomaly> {
    (stored != derived).then(|| ViewAnomaly::CounterMismatch {
        kind,
        key: key.to_owned(),
        field,
        stored,
        derived,
    })
}

fn check_adjacency_lengths(user: &User, anomalies: &mut Vec<ViewAnomaly>) {
    let key = user.id.as_str();
    anomalies.extend(mismatch(
        EntityKind::User,
        key,
        "followers_count",
        user.followers_count,
        len_u64(user.followers.len()),
    ));
    anomalies.extend(mismatch(
        EntityKind::User,
        key,
        "followees_count",
        user.followees_count,
        len_u64(user.followees.len()),
    ));
}

fn check_adjacency_duplicates(user: &User, anomalies: &mut Vec<ViewAnomaly>) {
    for (list, entries) in [("followers", &user.followers), ("followees", &user.followees)] {
        let mut seen: BTreeMap<&UserId, u64> = BTreeMap::new();
        for entry in entries {
            let count = seen.entry(entry).or_insert(0);
            *count = count.saturating_add(1);
        }
        anomalies.extend(seen.into_iter().filter(|(_, count)| *count > 1).map(|(entry, _)| {
            ViewAnomaly::DuplicateAdjacency {
                user: user.id.clone(),
                list,
                entry: entry.clone(),
            }
        }));
    }
}

fn check_follow_edges(view: &GraphSnapshot, anomalies: &mut Vec<ViewAnomaly>) {
    for edge in &view.follows {
        let listed_as_follower = view
            .user(&edge.followee)
            .is_some_and(|user| user.followers.contains(&edge.follower));
        let listed_as_followee = view
            .user(&edge.follower)
            .is_some_and(|user| user.followees.contains(&edge.followee));
        if !listed_as_follower || !listed_as_followee {
            anomalies.push(ViewAnomaly::EdgeWithoutAdjacency {
                key: FollowKey::new(&edge.followee, &edge.follower),
            });
        }
    }

    let mut missing: Vec<FollowKey> = Vec::new();
    for user in view.users.values() {
        let as_followee = user
            .followers
            .iter()
            .map(|follower| FollowKey::new(&user.id, follower));
        let as_follower = user
            .followees
            .iter()
            .map(|followee| FollowKey::new(followee, &user.id));
        for key in as_followee.chain(as_follower) {
            if view.follow(&key).is_none() && !missing.contains(&key) {
                missing.push(key);
            }
        }
    }
    anomalies.extend(
        missing
            .into_iter()
            .map(|key| ViewAnomaly::AdjacencyWithoutEdge { key }),
    );
}

fn check_posts(view: &GraphSnapshot, anomalies: &mut Vec<ViewAnomaly>) {
    let mut post_tallies: BTreeMap<String, Tally> = BTreeMap::new();
    let mut user_tallies: BTreeMap<String, Tally> = BTreeMap::new();

    for like in &view.likes {
        if view.post(&like.post).is_none() || view.user(&like.user).is_none() {
            anomalies.push(ViewAnomaly::DanglingLike {
                user: like.user.clone(),
                post: like.post.clone(),
            });
        }
        bump(&mut post_tallies, like.post.as_str(), |t| &mut t.likes);
        bump(&mut user_tallies, like.user.as_str(), |t| &mut t.likes);
    }

    for post in view.posts.values() {
        let expected = post
            .origin
            .as_ref()
            .map_or(PostSubtype::Original, PostOrigin::subtype);
        if post.subtype != expected {
            anomalies.push(ViewAnomaly::SubtypeMismatch {
                post: post.id.clone(),
                stored: post.subtype,
                expected,
            });
        }

        let author = post.author.as_str();
        match &post.origin {
            None => bump(&mut user_tallies, author, |t| &mut t.posts),
            Some(PostOrigin::Comment(origin)) => {
                bump(&mut user_tallies, author, |t| &mut t.comments);
                bump(&mut post_tallies, origin.as_str(), |t| &mut t.comments);
            }
            Some(PostOrigin::Repost(origin) | PostOrigin::Quote(origin)) => {
                bump(&mut user_tallies, author, |t| &mut t.reposts);
                bump(&mut post_tallies, origin.as_str(), |t| &mut t.reposts);
            }
        }

        if let Some(origin) = post.origin.as_ref().map(PostOrigin::id) {
            if view.post(origin).is_none() {
                anomalies.push(ViewAnomaly::DanglingOrigin {
                    post: post.id.clone(),
                    origin: origin.clone(),
                });
            }
        }
    }

    let empty = Tally::default();
    for post in view.posts.values() {
        let key = post.id.as_str();
        let derived = post_tallies.get(key).unwrap_or(&empty);
        for (field, stored, expected) in [
            ("likes_count", post.likes_count, derived.likes),
            ("comments_count", post.comments_count, derived.comments),
            ("repost_count", post.repost_count, derived.reposts),
        ] {
            anomalies.extend(mismatch(EntityKind::Post, key, field, stored, expected));
        }
    }
    for user in view.users.values() {
        let key = user.id.as_str();
        let derived = user_tallies.get(key).unwrap_or(&empty);
        for (field, stored, expected) in [
            ("likes_count", user.likes_count, derived.likes),
            ("posts_count", user.posts_count, derived.posts),
            ("comments_count", user.comments_count, derived.comments),
            ("reposts_count", user.reposts_count, derived.reposts),
        ] {
            anomalies.extend(mismatch(EntityKind::User, key, field, stored, expected));
        }
    }
}
