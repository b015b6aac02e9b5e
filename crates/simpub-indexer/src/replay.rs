//! The replay loop: feed every sourced event to the projector, in order.

use std::collections::BTreeMap;

use simpub_projector::{ApplyOutcome, GraphProjector, SkipReason};
use simpub_store::{EntityStore, GraphSnapshot, MemoryStore};

use crate::error::IndexerError;
use crate::source::SourcedEvent;

/// Counts of what a replay did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayStats {
    /// Events handed to the projector.
    pub total: u64,
    /// Events that changed the view.
    pub applied: u64,
    /// Skipped events, per reason.
    pub skipped: BTreeMap<SkipReason, u64>,
}

impl ReplayStats {
    fn record(&mut self, outcome: ApplyOutcome) {
        self.total = self.total.saturating_add(1);
        match outcome {
            ApplyOutcome::Applied => self.applied = self.applied.saturating_add(1),
            ApplyOutcome::Skipped(reason) => {
                let count = self.skipped.entry(reason).or_insert(0);
                *count = count.saturating_add(1);
            }
        }
    }

    /// Number of skipped events across all reasons.
    pub fn skipped_total(&self) -> u64 {
        self.skipped
            .values()
            .fold(0, |sum, count| sum.saturating_add(*count))
    }
}

/// Apply every event to the projector and tally the outcomes.
///
/// Stops at the first source or projection error.
///
/// # Errors
///
/// Returns the source's error as is, or [`IndexerError::Projection`] with
/// the line of the event the projector failed on.
pub fn replay<S, I>(
    projector: &mut GraphProjector<S>,
    events: I,
) -> Result<ReplayStats, IndexerError>
where
    S: EntityStore,
    I: IntoIterator<Item = Result<SourcedEvent, IndexerError>>,
{
    let mut stats = ReplayStats::default();
    for sourced in events {
        let SourcedEvent { line, event } = sourced?;
        let outcome = projector
            .handle(&event)
            .map_err(|source| IndexerError::Projection { line, source })?;
        stats.record(outcome);
    }
    Ok(stats)
}

/// Consume the projector and export the view it built.
///
/// # Errors
///
/// Returns [`IndexerError::Store`] if a stored document no longer decodes.
pub fn into_snapshot(
    projector: GraphProjector<MemoryStore>,
) -> Result<GraphSnapshot, IndexerError> {
    Ok(projector.into_store().snapshot()?)
}
