//! Error taxonomy of the orchestration core.
//!
//! Configuration-stage failures are fatal and are raised before any worker
//! starts. Scenario failures are not errors; they are recorded as
//! [`UnitOutcome::Failed`](crate::core::models::UnitOutcome::Failed).

use std::path::PathBuf;
use thiserror::Error;

/// Failures raised while resolving feature files or cloning the configuration.
#[derive(Debug, Error)]
pub enum SplitError {
    /// A feature source could not be enumerated or does not exist.
    #[error("failed to read feature source '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration resolves to zero feature files.
    #[error("no feature files found in {}", describe_sources(.sources))]
    EmptyFeatureSet { sources: Vec<PathBuf> },

    /// A per-feature configuration clone could not be constructed.
    #[error("cannot build configuration for '{}': {reason}", .feature.display())]
    ConfigClone { feature: PathBuf, reason: String },

    /// The feature file mask is not a valid glob.
    #[error("invalid feature mask '{pattern}': {source}")]
    InvalidMask {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

impl SplitError {
    pub(crate) fn clone_error(feature: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ConfigClone {
            feature: feature.into(),
            reason: reason.into(),
        }
    }
}

fn describe_sources(sources: &[PathBuf]) -> String {
    if sources.is_empty() {
        return "an empty feature source list".to_string();
    }
    sources
        .iter()
        .map(|p| format!("'{}'", p.display()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Failures of the worker pool itself, never of a unit it runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    #[error("worker pool capacity must be at least 1")]
    ZeroCapacity,
    #[error("worker pool is no longer accepting units")]
    Closed,
}

/// A fatal error that aborted a run before its verdict could be computed.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Split(#[from] SplitError),
    #[error(transparent)]
    Pool(#[from] PoolError),
}
