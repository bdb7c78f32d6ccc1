use super::firestore::FirestoreScoreStore;
use super::memory::MemoryScoreStore;
use super::types::{StoreError, StoreRef, StoreResult, StoredScore};
use crate::config::types::{StoreConfig, StoreKind};
use crate::leaderboard::types::ScoreEntry;

use async_trait::async_trait;
use std::sync::Arc;

/// An ordered collection of score documents.
///
/// Implementations perform exactly one remote operation per call and never retry;
/// a failure is reported to the caller immediately.
#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// Persists a new entry and returns the reference assigned to it.
    async fn insert(&self, entry: &ScoreEntry) -> StoreResult<StoreRef>;

    /// Returns at most `limit` entries ordered by descending score.
    /// The order of equal scores is store-defined.
    async fn top(&self, limit: usize) -> StoreResult<Vec<StoredScore>>;

    /// Deletes the referenced entry. Deleting an entry that no longer exists succeeds.
    async fn delete(&self, reference: &StoreRef) -> StoreResult<()>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}

/// The store handle injected into the leaderboard.
#[derive(Clone)]
pub enum StoreBackend {
    Available(Arc<dyn ScoreStore>),
    Unavailable { reason: String },
}

impl StoreBackend {
    pub fn available<S: ScoreStore + 'static>(store: S) -> Self {
        Self::Available(Arc::new(store))
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    /// Returns the live store, or `StoreError::NotInitialized` in degraded mode.
    pub fn store(&self) -> StoreResult<&Arc<dyn ScoreStore>> {
        match self {
            Self::Available(store) => Ok(store),
            Self::Unavailable { .. } => Err(StoreError::NotInitialized),
        }
    }
}

impl std::fmt::Debug for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available(store) => f.debug_tuple("Available").field(&store.name()).finish(),
            Self::Unavailable { reason } => f
                .debug_struct("Unavailable")
                .field("reason", reason)
                .finish(),
        }
    }
}

/// Builds the store backend described by `config`.
///
/// Never fails: missing or unusable credentials yield `StoreBackend::Unavailable`
/// so the server still starts and reports the database as unavailable per request.
pub fn connect(config: &StoreConfig) -> StoreBackend {
    match config.kind {
        StoreKind::Memory => {
            tracing::warn!("Using in-memory score store, scores are lost on restart");
            StoreBackend::available(MemoryScoreStore::new())
        }
        StoreKind::Firestore => connect_firestore(config),
    }
}

fn connect_firestore(config: &StoreConfig) -> StoreBackend {
    if let Some(host) = &config.emulator_host {
        let Some(project_id) = &config.project_id else {
            tracing::warn!(
                "FIRESTORE_EMULATOR_HOST is set but no project id was given, Firestore will not work"
            );
            return StoreBackend::unavailable("emulator configured without a project id");
        };

        tracing::info!(
            "Using Firestore emulator at {} (project {}, collection {})",
            host,
            project_id,
            config.collection
        );
        return StoreBackend::available(FirestoreScoreStore::emulator(
            host,
            project_id,
            &config.collection,
        ));
    }

    let key = match config.credentials.load() {
        Ok(key) => key,
        Err(e) => {
            tracing::warn!(
                "No Firebase credentials found ({}): {}. Firestore will not work",
                config.credentials,
                e
            );
            return StoreBackend::unavailable(e.to_string());
        }
    };

    match FirestoreScoreStore::new(key, config.project_id.clone(), &config.collection) {
        Ok(store) => {
            tracing::info!(
                "Connected to Firestore project {} (collection {})",
                store.project_id(),
                config.collection
            );
            StoreBackend::available(store)
        }
        Err(e) => {
            tracing::warn!("Failed to set up Firestore client: {}", e);
            StoreBackend::unavailable(e.to_string())
        }
    }
}
