//! Store doubles shared by the test suites.

use super::backend::ScoreStore;
use super::memory::MemoryScoreStore;
use super::types::{StoreError, StoreRef, StoreResult, StoredScore};
use crate::leaderboard::types::ScoreEntry;

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::Mutex;

/// Which store operation a `FaultyScoreStore` fails, and with what.
#[derive(Debug, Clone, Default)]
pub struct Faults {
    pub insert: Option<StoreError>,
    pub top: Option<StoreError>,
    pub delete: Option<StoreError>,
}

/// A `MemoryScoreStore` whose operations can be made to fail on demand.
pub struct FaultyScoreStore {
    pub inner: Arc<MemoryScoreStore>,
    faults: Mutex<Faults>,
}

impl FaultyScoreStore {
    pub fn new(inner: Arc<MemoryScoreStore>) -> Self {
        Self {
            inner,
            faults: Mutex::new(Faults::default()),
        }
    }

    pub fn set_faults(&self, faults: Faults) {
        *self.faults.lock().unwrap() = faults;
    }

    fn fault(&self, pick: impl Fn(&Faults) -> Option<StoreError>) -> StoreResult<()> {
        match pick(&self.faults.lock().unwrap()) {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ScoreStore for FaultyScoreStore {
    async fn insert(&self, entry: &ScoreEntry) -> StoreResult<StoreRef> {
        self.fault(|f| f.insert.clone())?;
        self.inner.insert(entry).await
    }

    async fn top(&self, limit: usize) -> StoreResult<Vec<StoredScore>> {
        self.fault(|f| f.top.clone())?;
        self.inner.top(limit).await
    }

    async fn delete(&self, reference: &StoreRef) -> StoreResult<()> {
        self.fault(|f| f.delete.clone())?;
        self.inner.delete(reference).await
    }

    fn name(&self) -> &str {
        "faulty"
    }
}

/// Lets callers share one `MemoryScoreStore` between a backend and assertions.
#[async_trait]
impl ScoreStore for Arc<MemoryScoreStore> {
    async fn insert(&self, entry: &ScoreEntry) -> StoreResult<StoreRef> {
        (**self).insert(entry).await
    }

    async fn top(&self, limit: usize) -> StoreResult<Vec<StoredScore>> {
        (**self).top(limit).await
    }

    async fn delete(&self, reference: &StoreRef) -> StoreResult<()> {
        (**self).delete(reference).await
    }

    fn name(&self) -> &str {
        "memory"
    }
}
