//! Error types for the fallible edges of the game
//!
//! The simulation itself never fails. Only preference files and the score
//! board touch the outside world, and their failures stay at that boundary.

use std::path::PathBuf;

use thiserror::Error;

/// Why a player name was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("player name must not be empty")]
    Empty,
    #[error("player name is {len} characters, at most {max} allowed")]
    TooLong { len: usize, max: usize },
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read/write settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("settings file {path} is malformed: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    InvalidName(#[from] NameError),
}

#[derive(Debug, Error)]
pub enum LeaderboardError {
    /// No board is configured (or it was lost to a poisoned lock)
    #[error("leaderboard not available")]
    Unavailable,
    #[error(transparent)]
    InvalidName(#[from] NameError),
    #[error("failed to read/write leaderboard file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("leaderboard file {path} is malformed: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("leaderboard worker stopped before reporting")]
    WorkerGone,
}
