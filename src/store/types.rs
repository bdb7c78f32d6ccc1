use crate::leaderboard::types::ScoreEntry;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque handle identifying one persisted score document.
///
/// For Firestore this is the full document resource name; for the in-memory store
/// it is a UUID. It is used for deletion only and never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct StoreRef(pub String);

impl StoreRef {
    /// Generates a new random UUID v4-based reference.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

/// A score entry together with the reference the store assigned to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredScore {
    pub reference: StoreRef,
    pub entry: ScoreEntry,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No store was configured at startup.
    #[error("Database not initialized")]
    NotInitialized,

    /// The store could not be reached or refused our credentials.
    #[error("Database unavailable: {0}")]
    Unavailable(String),

    /// The store answered, but with an error or a body we could not use.
    #[error("Database operation failed: {0}")]
    Operation(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
