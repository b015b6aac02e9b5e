//! What happened when an event was handed to the projector.

/// Result of applying a single event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The event changed the view.
    Applied,
    /// The event was a no-op. The view is unchanged, except for the
    /// documented partial writes of [`ReplayMode::Legacy`].
    ///
    /// [`ReplayMode::Legacy`]: crate::config::ReplayMode::Legacy
    Skipped(SkipReason),
}

impl ApplyOutcome {
    /// Whether the event changed the view.
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Why an event was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SkipReason {
    /// A referenced user does not exist.
    MissingUser,
    /// A referenced post does not exist.
    MissingPost,
    /// The origin of a repost, quote, or comment does not exist.
    MissingOrigin,
    /// The relation to remove does not exist.
    MissingEdge,
    /// The relation to create already exists.
    DuplicateEdge,
    /// A post with the new id already exists.
    DuplicatePost,
    /// A post id does not have the content-addressed shape.
    InvalidPostId,
    /// A follow edge exists but one side's adjacency list lacks the other.
    AdjacencyMismatch,
}

impl SkipReason {
    /// Stable snake-case label for logs and statistics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingUser => "missing_user",
            Self::MissingPost => "missing_post",
            Self::MissingOrigin => "missing_origin",
            Self::MissingEdge => "missing_edge",
            Self::DuplicateEdge => "duplicate_edge",
            Self::DuplicatePost => "duplicate_post",
            Self::InvalidPostId => "invalid_post_id",
            Self::AdjacencyMismatch => "adjacency_mismatch",
        }
    }
}

impl core::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
