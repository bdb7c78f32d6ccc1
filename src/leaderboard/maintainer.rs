use super::types::{LeaderboardError, ScoreEntry, SubmitOutcome};
use crate::store::backend::{ScoreStore, StoreBackend};
use crate::store::types::{StoreRef, StoreResult};

/// Entries fetched past K per round of `prune`.
pub const PRUNE_BATCH: usize = 100;

/// Largest K accepted by any leaderboard operation.
pub const MAX_LEADERBOARD_SIZE: usize = 10_000;

/// Keeps the score collection bounded to its top K entries.
///
/// Holds no shared mutable state of its own; all state lives in the store, so a
/// single instance can serve any number of concurrent requests.
pub struct Leaderboard {
    backend: StoreBackend,
}

impl Leaderboard {
    pub fn new(backend: StoreBackend) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &StoreBackend {
        &self.backend
    }

    /// Returns the `k` best entries, highest score first.
    pub async fn list_top(&self, k: usize) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        check_bound(k)?;
        let store = self.backend.store()?;

        let ranked = store.top(k).await.map_err(|e| {
            tracing::error!("Error fetching scores: {}", e);
            LeaderboardError::from(e)
        })?;

        Ok(ranked.into_iter().map(|stored| stored.entry).collect())
    }

    /// Inserts `entry`, then evicts the (k+1)-th ranked entry if one exists.
    ///
    /// A failed insert aborts with nothing persisted. A failure after the insert
    /// leaves the entry in place and is reported as `MaintenanceFailed`.
    pub async fn submit(
        &self,
        entry: ScoreEntry,
        k: usize,
    ) -> Result<SubmitOutcome, LeaderboardError> {
        check_bound(k)?;
        let store = self.backend.store()?;

        let reference = store.insert(&entry).await.map_err(|e| {
            tracing::error!("Error saving score: {}", e);
            LeaderboardError::from(e)
        })?;

        tracing::debug!(
            "Stored score {} for {} as {}",
            entry.score,
            entry.player_name,
            reference.0
        );

        match evict_overflow(&**store, k).await {
            Ok(evicted) => Ok(SubmitOutcome { reference, evicted }),
            Err(e) => {
                tracing::error!("Leaderboard maintenance failed after insert: {}", e);
                Err(LeaderboardError::MaintenanceFailed {
                    reference,
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Deletes every entry ranked beyond `k`. Returns how many were deleted.
    pub async fn prune(&self, k: usize) -> Result<usize, LeaderboardError> {
        check_bound(k)?;
        let store = self.backend.store()?;

        let mut deleted = 0;
        loop {
            let ranked = store.top(k + PRUNE_BATCH).await?;
            let fetched = ranked.len();

            for stored in ranked.into_iter().skip(k) {
                store.delete(&stored.reference).await?;
                deleted += 1;
            }

            if fetched < k + PRUNE_BATCH {
                break;
            }
        }

        if deleted > 0 {
            tracing::info!("Pruned {} scores ranked beyond {}", deleted, k);
        }

        Ok(deleted)
    }
}

/// The trim step of `submit`: reads the top `k + 1` entries and deletes the last
/// one if the collection holds more than `k`.
///
/// The victim is always the lowest-ranked entry of this call's own view, even when
/// that is an entry another writer just inserted or one a concurrent call is also
/// deleting.
pub async fn evict_overflow(store: &dyn ScoreStore, k: usize) -> StoreResult<Option<StoreRef>> {
    let ranked = store.top(k + 1).await?;
    let Some(overflow) = ranked.into_iter().nth(k) else {
        return Ok(None);
    };

    store.delete(&overflow.reference).await?;
    tracing::info!(
        "Deleted overflow score: {} ({} by {})",
        overflow.reference.0,
        overflow.entry.score,
        overflow.entry.player_name
    );

    Ok(Some(overflow.reference))
}

fn check_bound(k: usize) -> Result<(), LeaderboardError> {
    if k == 0 {
        return Err(LeaderboardError::InvalidArgument(
            "leaderboard size must be positive".to_string(),
        ));
    }
    if k > MAX_LEADERBOARD_SIZE {
        return Err(LeaderboardError::InvalidArgument(format!(
            "leaderboard size {} exceeds the maximum of {}",
            k, MAX_LEADERBOARD_SIZE
        )));
    }
    Ok(())
}
