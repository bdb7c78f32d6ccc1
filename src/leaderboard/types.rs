use crate::store::types::{StoreError, StoreRef};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single leaderboard submission.
///
/// No validation is applied: names need not be unique and scores may be any integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEntry {
    pub player_name: String,
    pub score: i64,
}

impl ScoreEntry {
    pub fn new(player_name: impl Into<String>, score: i64) -> Self {
        Self {
            player_name: player_name.into(),
            score,
        }
    }
}

/// Result of a fully completed `submit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    /// Reference of the inserted entry.
    pub reference: StoreRef,
    /// Entry evicted by the trim step, if the collection exceeded K.
    /// This may be the entry just inserted.
    pub evicted: Option<StoreRef>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LeaderboardError {
    /// No usable store connection, whether never configured or lost.
    #[error("{0}")]
    StoreUnavailable(String),

    /// The entry was inserted but trimming the collection to K failed.
    /// The entry stays persisted.
    #[error("Score recorded but leaderboard maintenance failed: {reason}")]
    MaintenanceFailed { reference: StoreRef, reason: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0}")]
    StoreOperationFailed(String),
}

impl From<StoreError> for LeaderboardError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotInitialized | StoreError::Unavailable(_) => {
                Self::StoreUnavailable(e.to_string())
            }
            StoreError::Operation(_) => Self::StoreOperationFailed(e.to_string()),
        }
    }
}
