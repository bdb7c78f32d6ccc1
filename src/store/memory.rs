use super::backend::ScoreStore;
use super::types::{StoreRef, StoreResult, StoredScore};
use crate::leaderboard::types::ScoreEntry;

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// A process-local score collection.
///
/// Equal scores are ranked by insertion order, which is one valid instance of the
/// store-defined tie-break the leaderboard allows.
pub struct MemoryScoreStore {
    entries: DashMap<StoreRef, (u64, ScoreEntry)>,
    sequence: AtomicU64,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            sequence: AtomicU64::new(0),
        }
    }

    pub fn store_local(&self, entry: ScoreEntry) -> StoreRef {
        let reference = StoreRef::new();
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        self.entries.insert(reference.clone(), (seq, entry));
        reference
    }

    pub fn contains(&self, reference: &StoreRef) -> bool {
        self.entries.contains_key(reference)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, ranked.
    pub fn ranked(&self) -> Vec<StoredScore> {
        let mut rows: Vec<(u64, StoredScore)> = self
            .entries
            .iter()
            .map(|item| {
                let (seq, entry) = item.value();
                (
                    *seq,
                    StoredScore {
                        reference: item.key().clone(),
                        entry: entry.clone(),
                    },
                )
            })
            .collect();

        rows.sort_by(|(seq_a, a), (seq_b, b)| {
            b.entry
                .score
                .cmp(&a.entry.score)
                .then_with(|| seq_a.cmp(seq_b))
        });

        rows.into_iter().map(|(_, stored)| stored).collect()
    }
}

impl Default for MemoryScoreStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScoreStore for MemoryScoreStore {
    async fn insert(&self, entry: &ScoreEntry) -> StoreResult<StoreRef> {
        Ok(self.store_local(entry.clone()))
    }

    async fn top(&self, limit: usize) -> StoreResult<Vec<StoredScore>> {
        let mut ranked = self.ranked();
        ranked.truncate(limit);
        Ok(ranked)
    }

    async fn delete(&self, reference: &StoreRef) -> StoreResult<()> {
        self.entries.remove(reference);
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
