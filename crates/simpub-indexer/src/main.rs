//! Replay host for the SimPub graph indexer.
//!
//! Reads an ordered social-event log, projects it into the graph view, and
//! writes the resulting view out as JSON.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `simpub-config.yaml` (defaults if absent)
//! 2. Initialize structured logging (tracing)
//! 3. Open the JSON Lines event log
//! 4. Replay every event through the projector
//! 5. Verify the view, when enabled
//! 6. Write the view snapshot, when a path is configured

mod error;
mod replay;
mod source;

use std::path::Path;

use anyhow::Context;
use simpub_projector::{GraphProjector, IndexerConfig, LoggingConfig, VerifyResult, verify_view};
use simpub_store::MemoryStore;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::source::JsonLinesSource;

/// Configuration file looked up in the working directory.
const CONFIG_PATH: &str = "simpub-config.yaml";

fn main() -> anyhow::Result<()> {
    // 1. Load configuration.
    let config = load_config().context("loading configuration")?;

    // 2. Initialize structured logging.
    init_logging(&config.logging);
    info!("simpub-indexer starting");
    info!(
        replay_mode = ?config.projector.replay_mode,
        events_path = %config.source.events_path.display(),
        strict_ordering = config.source.strict_ordering,
        verify = config.output.verify,
        "Configuration loaded"
    );

    // 3. Open the event log.
    let events = JsonLinesSource::open(&config.source.events_path, config.source.strict_ordering)?;

    // 4. Replay.
    let mut projector = GraphProjector::with_config(MemoryStore::new(), config.projector);
    let stats = replay::replay(&mut projector, events)?;
    info!(
        total = stats.total,
        applied = stats.applied,
        skipped = stats.skipped_total(),
        "Replay finished"
    );
    for (reason, count) in &stats.skipped {
        info!(%reason, count, "Skipped events");
    }

    let snapshot = replay::into_snapshot(projector)?;
    info!(
        users = snapshot.users.len(),
        posts = snapshot.posts.len(),
        follows = snapshot.follows.len(),
        likes = snapshot.likes.len(),
        "Graph view built"
    );

    // 5. Verify.
    if config.output.verify {
        match verify_view(&snapshot) {
            VerifyResult::Consistent => info!("View verified consistent"),
            VerifyResult::Anomalies(anomalies) => {
                for anomaly in &anomalies {
                    warn!(%anomaly, "View anomaly");
                }
                warn!(count = anomalies.len(), "View verification found anomalies");
            }
        }
    }

    // 6. Write the snapshot.
    if let Some(path) = &config.output.snapshot_path {
        let json = serde_json::to_string_pretty(&snapshot).context("encoding snapshot")?;
        std::fs::write(path, json)
            .with_context(|| format!("writing snapshot to {}", path.display()))?;
        info!(path = %path.display(), entities = snapshot.entity_count(), "Snapshot written");
    }

    Ok(())
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

/// Load `simpub-config.yaml`, falling back to defaults when it is absent.
///
/// Environment overrides apply in both cases.
fn load_config() -> anyhow::Result<IndexerConfig> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        Ok(IndexerConfig::from_file(config_path)?)
    } else {
        let mut config = IndexerConfig::default();
        config.apply_env_overrides()?;
        Ok(config)
    }
}
