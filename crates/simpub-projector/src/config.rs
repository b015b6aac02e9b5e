//! Configuration loading and typed config structures for the indexer.
//!
//! The canonical configuration lives in `simpub-config.yaml` next to the
//! binary. Every section is optional and falls back to the defaults below.
//! A handful of environment variables override the file so deployments can
//! point the indexer at different inputs without editing it.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

/// Overrides `source.events_path`.
pub const ENV_EVENTS_PATH: &str = "SIMPUB_EVENTS_PATH";

/// Overrides `output.snapshot_path`.
pub const ENV_SNAPSHOT_PATH: &str = "SIMPUB_SNAPSHOT_PATH";

/// Overrides `projector.replay_mode`.
pub const ENV_REPLAY_MODE: &str = "SIMPUB_REPLAY_MODE";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An environment override holds a value the field cannot take.
    #[error("invalid value {value:?} for {var}: {reason}")]
    InvalidOverride {
        /// Name of the environment variable.
        var: &'static str,
        /// The rejected value.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level indexer configuration.
///
/// Mirrors the structure of `simpub-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IndexerConfig {
    /// Projection behavior.
    #[serde(default)]
    pub projector: ProjectorConfig,

    /// Where events come from.
    #[serde(default)]
    pub source: SourceConfig,

    /// What to do with the view after replay.
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl IndexerConfig {
    /// Load configuration from a YAML file, then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::InvalidOverride`] if an override is malformed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yml::from_str(&contents)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string. No overrides are applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Override fields from the process environment when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOverride`] if `SIMPUB_REPLAY_MODE`
    /// names an unknown mode.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|var| std::env::var(var).ok())
    }

    /// Override fields from any variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOverride`] if the replay mode override
    /// names an unknown mode.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(val) = lookup(ENV_EVENTS_PATH) {
            self.source.events_path = PathBuf::from(val);
        }
        if let Some(val) = lookup(ENV_SNAPSHOT_PATH) {
            self.output.snapshot_path = Some(PathBuf::from(val));
        }
        if let Some(val) = lookup(ENV_REPLAY_MODE) {
            self.projector.replay_mode =
                val.parse().map_err(|reason| ConfigError::InvalidOverride {
                    var: ENV_REPLAY_MODE,
                    value: val.clone(),
                    reason,
                })?;
        }
        Ok(())
    }
}

/// How the projector treats duplicate deliveries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayMode {
    /// Every duplicate event is a no-op; counters always match relations.
    #[default]
    Idempotent,
    /// Count duplicate deliveries again. A repeated Follow grows both
    /// adjacency lists, and a repeated Like bumps both like counters. A
    /// repeated Repost/Quote/Comment still bumps its origin.
    Legacy,
}

impl FromStr for ReplayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "idempotent" => Ok(Self::Idempotent),
            "legacy" => Ok(Self::Legacy),
            other => Err(format!("unknown replay mode: {other}")),
        }
    }
}

/// Projection behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ProjectorConfig {
    /// Duplicate-delivery handling.
    #[serde(default)]
    pub replay_mode: ReplayMode,
}

/// Event source configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceConfig {
    /// JSON Lines file holding the ordered event log.
    #[serde(default = "default_events_path")]
    pub events_path: PathBuf,

    /// Reject the log when a timestamp goes backwards instead of warning.
    #[serde(default)]
    pub strict_ordering: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            events_path: default_events_path(),
            strict_ordering: false,
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    /// Where to write the final view as JSON; `None` disables the write.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: Option<PathBuf>,

    /// Run the invariant verifier after replay.
    #[serde(default = "default_true")]
    pub verify: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
            verify: true,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_events_path() -> PathBuf {
    PathBuf::from("events.jsonl")
}

#[allow(clippy::unnecessary_wraps)]
fn default_snapshot_path() -> Option<PathBuf> {
    Some(PathBuf::from("graph-snapshot.json"))
}

const fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_owned()
}
