//! Error types for settings population.

use std::path::PathBuf;
use thiserror::Error;

/// A descriptor source failed while it was being enumerated.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read settings directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("settings source unavailable: {0}")]
    Unavailable(String),
}

/// A single descriptor could not be turned into a settings object.
///
/// Rejections are an expected per-item outcome. The cache skips the
/// descriptor and never surfaces the rejection to its callers.
#[derive(Debug, Error)]
pub enum Rejection {
    #[error("failed to read {origin}: {source}")]
    Unreadable {
        origin: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed settings in {origin}: {message}")]
    Malformed { origin: String, message: String },
}

/// Errors returned by [`SettingsCache::all`](crate::cache::SettingsCache::all).
///
/// Only the caller that ran the population ever sees these. Every
/// other caller receives whatever entries were inserted before the
/// fault.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("settings source failed: {0}")]
    Source(#[from] SourceError),

    #[error("settings source panicked while listing {phase} descriptors")]
    SourcePanicked { phase: String },

    #[error("parser panicked while processing {origin}")]
    ParserPanicked { origin: String },

    #[error("population task failed: {0}")]
    Population(#[from] tokio::task::JoinError),

    #[error("settings cache closed before it became ready")]
    Closed,
}
