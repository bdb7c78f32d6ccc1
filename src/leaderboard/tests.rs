//! Leaderboard Module Tests
//!
//! Exercises the bounded top-K protocol against in-memory store doubles.
//!
//! ## Test Scopes
//! - **ListTop**: Ordering, short collections, invalid bounds, store failures.
//! - **Submit**: Eviction of the (K+1)-th entry, no deduplication, immediate eviction of
//!   low scores, and the split between "nothing happened" and `MaintenanceFailed`.
//! - **Races**: Concurrent submissions may leave the collection above K, never below it,
//!   and never evict one of the true top K.
//! - **Prune / Sweeper**: Convergence back to K.

#[cfg(test)]
mod tests {
    use crate::leaderboard::maintainer::{Leaderboard, MAX_LEADERBOARD_SIZE, evict_overflow};
    use crate::leaderboard::sweeper::spawn_sweeper;
    use crate::leaderboard::types::{LeaderboardError, ScoreEntry};
    use crate::store::backend::{ScoreStore, StoreBackend};
    use crate::store::memory::MemoryScoreStore;
    use crate::store::testing::{Faults, FaultyScoreStore};
    use crate::store::types::{StoreError, StoreRef, StoreResult, StoredScore};

    use async_trait::async_trait;
    use proptest::prelude::*;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Barrier;

    fn entry(name: &str, score: i64) -> ScoreEntry {
        ScoreEntry::new(name, score)
    }

    fn memory_leaderboard() -> (Arc<MemoryScoreStore>, Leaderboard) {
        let store = Arc::new(MemoryScoreStore::new());
        let leaderboard = Leaderboard::new(StoreBackend::available(store.clone()));
        (store, leaderboard)
    }

    fn faulty_leaderboard() -> (Arc<FaultyScoreStore>, Leaderboard) {
        let store = Arc::new(FaultyScoreStore::new(Arc::new(MemoryScoreStore::new())));
        let leaderboard = Leaderboard::new(StoreBackend::Available(store.clone()));
        (store, leaderboard)
    }

    fn score_list(entries: &[ScoreEntry]) -> Vec<i64> {
        entries.iter().map(|e| e.score).collect()
    }

    // ============================================================
    // LIST TOP
    // ============================================================

    #[tokio::test]
    async fn test_list_top_empty_store() {
        let (_store, leaderboard) = memory_leaderboard();
        assert!(leaderboard.list_top(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_top_returns_all_when_fewer_than_k() {
        let (store, leaderboard) = memory_leaderboard();
        store.store_local(entry("a", 3));
        store.store_local(entry("b", 9));

        let top = leaderboard.list_top(10).await.unwrap();
        assert_eq!(score_list(&top), vec![9, 3]);
    }

    #[tokio::test]
    async fn test_list_top_limits_and_orders() {
        let (store, leaderboard) = memory_leaderboard();
        for score in [4, -2, 17, 8, 0, 11] {
            store.store_local(entry("p", score));
        }

        let top = leaderboard.list_top(3).await.unwrap();
        assert_eq!(score_list(&top), vec![17, 11, 8]);
    }

    #[tokio::test]
    async fn test_zero_bound_is_invalid_argument() {
        let (store, leaderboard) = memory_leaderboard();

        assert!(matches!(
            leaderboard.list_top(0).await,
            Err(LeaderboardError::InvalidArgument(_))
        ));
        assert!(matches!(
            leaderboard.submit(entry("a", 1), 0).await,
            Err(LeaderboardError::InvalidArgument(_))
        ));
        assert!(matches!(
            leaderboard.prune(0).await,
            Err(LeaderboardError::InvalidArgument(_))
        ));
        assert!(store.is_empty(), "Rejected submissions must not be stored");
    }

    #[tokio::test]
    async fn test_oversized_bound_is_invalid_argument() {
        let (store, leaderboard) = memory_leaderboard();

        for k in [MAX_LEADERBOARD_SIZE + 1, usize::MAX] {
            assert!(matches!(
                leaderboard.list_top(k).await,
                Err(LeaderboardError::InvalidArgument(_))
            ));
            assert!(matches!(
                leaderboard.submit(entry("a", 1), k).await,
                Err(LeaderboardError::InvalidArgument(_))
            ));
            assert!(matches!(
                leaderboard.prune(k).await,
                Err(LeaderboardError::InvalidArgument(_))
            ));
        }
        assert!(store.is_empty(), "Rejected submissions must not be stored");

        let outcome = leaderboard
            .submit(entry("a", 1), MAX_LEADERBOARD_SIZE)
            .await
            .unwrap();
        assert_eq!(outcome.evicted, None);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_unavailable_backend() {
        let leaderboard = Leaderboard::new(StoreBackend::unavailable("no credentials"));

        let list = leaderboard.list_top(10).await.unwrap_err();
        let submit = leaderboard.submit(entry("a", 1), 10).await.unwrap_err();

        for err in [list, submit] {
            assert_eq!(
                err,
                LeaderboardError::StoreUnavailable("Database not initialized".to_string())
            );
        }
    }

    #[tokio::test]
    async fn test_list_top_propagates_store_errors() {
        let (store, leaderboard) = faulty_leaderboard();

        store.set_faults(Faults {
            top: Some(StoreError::Unavailable("connection refused".to_string())),
            ..Faults::default()
        });
        assert!(matches!(
            leaderboard.list_top(10).await,
            Err(LeaderboardError::StoreUnavailable(_))
        ));

        store.set_faults(Faults {
            top: Some(StoreError::Operation("400 Bad Request".to_string())),
            ..Faults::default()
        });
        let err = leaderboard.list_top(10).await.unwrap_err();
        assert!(matches!(err, LeaderboardError::StoreOperationFailed(_)));
        assert!(err.to_string().contains("400 Bad Request"));
    }

    // ============================================================
    // SUBMIT
    // ============================================================

    #[tokio::test]
    async fn test_concrete_scenario_k3() {
        let (store, leaderboard) = memory_leaderboard();

        leaderboard.submit(entry("A", 50), 3).await.unwrap();
        leaderboard.submit(entry("B", 30), 3).await.unwrap();
        leaderboard.submit(entry("C", 10), 3).await.unwrap();
        let last = leaderboard.submit(entry("D", 40), 3).await.unwrap();

        assert!(last.evicted.is_some(), "Fourth entry should trigger an eviction");
        assert_eq!(
            leaderboard.list_top(3).await.unwrap(),
            vec![entry("A", 50), entry("D", 40), entry("B", 30)]
        );
        assert_eq!(store.len(), 3, "C should have been evicted");
    }

    #[tokio::test]
    async fn test_submit_into_full_board_removes_minimum() {
        let (store, leaderboard) = memory_leaderboard();
        let lowest = store.store_local(entry("p1", 10));
        for score in (2..=10).map(|i| i * 10) {
            store.store_local(entry("p", score));
        }
        assert_eq!(store.len(), 10);

        let outcome = leaderboard.submit(entry("new", 55), 10).await.unwrap();

        assert_eq!(store.len(), 10);
        assert_eq!(outcome.evicted, Some(lowest.clone()));
        assert!(!store.contains(&lowest));
        assert!(store.contains(&outcome.reference));
    }

    #[tokio::test]
    async fn test_submit_does_not_deduplicate() {
        let (store, leaderboard) = memory_leaderboard();
        for score in 1..=5 {
            store.store_local(entry("other", score));
        }

        let first = leaderboard.submit(entry("Twin", 42), 10).await.unwrap();
        let second = leaderboard.submit(entry("Twin", 42), 10).await.unwrap();

        assert_ne!(first.reference, second.reference);
        assert_eq!(store.len(), 7);
        let twins = leaderboard
            .list_top(10)
            .await
            .unwrap()
            .into_iter()
            .filter(|e| e == &entry("Twin", 42))
            .count();
        assert_eq!(twins, 2);
    }

    #[tokio::test]
    async fn test_low_score_is_evicted_immediately() {
        let (store, leaderboard) = memory_leaderboard();
        for (name, score) in [("A", 50), ("B", 40), ("C", 30)] {
            store.store_local(entry(name, score));
        }
        let before = leaderboard.list_top(3).await.unwrap();

        let outcome = leaderboard.submit(entry("Low", 5), 3).await.unwrap();

        assert_eq!(outcome.evicted, Some(outcome.reference.clone()));
        assert_eq!(leaderboard.list_top(3).await.unwrap(), before);
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn test_failed_insert_aborts_without_persisting() {
        let (store, leaderboard) = faulty_leaderboard();

        store.set_faults(Faults {
            insert: Some(StoreError::Unavailable("timed out".to_string())),
            ..Faults::default()
        });
        assert!(matches!(
            leaderboard.submit(entry("A", 1), 10).await,
            Err(LeaderboardError::StoreUnavailable(_))
        ));

        store.set_faults(Faults {
            insert: Some(StoreError::Operation("400 Bad Request".to_string())),
            ..Faults::default()
        });
        assert!(matches!(
            leaderboard.submit(entry("A", 1), 10).await,
            Err(LeaderboardError::StoreOperationFailed(_))
        ));

        assert!(store.inner.is_empty());
    }

    #[tokio::test]
    async fn test_query_failure_after_insert_is_maintenance_failed() {
        let (store, leaderboard) = faulty_leaderboard();
        store.set_faults(Faults {
            top: Some(StoreError::Unavailable("connection reset".to_string())),
            ..Faults::default()
        });

        let err = leaderboard.submit(entry("A", 1), 10).await.unwrap_err();

        match err {
            LeaderboardError::MaintenanceFailed { reference, reason } => {
                assert!(store.inner.contains(&reference), "Entry must stay persisted");
                assert!(reason.contains("connection reset"));
            }
            other => panic!("Expected MaintenanceFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_failure_after_insert_is_maintenance_failed() {
        let (store, leaderboard) = faulty_leaderboard();
        for score in [30, 20, 10] {
            store.inner.store_local(entry("p", score));
        }
        store.set_faults(Faults {
            delete: Some(StoreError::Operation("500 Internal Server Error".to_string())),
            ..Faults::default()
        });

        let err = leaderboard.submit(entry("A", 25), 3).await.unwrap_err();

        assert!(matches!(err, LeaderboardError::MaintenanceFailed { .. }));
        assert_eq!(store.inner.len(), 4, "No rollback of the inserted entry");
    }

    // ============================================================
    // EVICT OVERFLOW (isolated trim step)
    // ============================================================

    #[tokio::test]
    async fn test_evict_overflow_within_bound_is_noop() {
        let store = MemoryScoreStore::new();
        for score in [1, 2, 3] {
            store.store_local(entry("p", score));
        }

        assert_eq!(evict_overflow(&store, 3).await.unwrap(), None);
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn test_evict_overflow_deletes_only_the_k_plus_first() {
        let store = MemoryScoreStore::new();
        for score in [50, 40, 30] {
            store.store_local(entry("p", score));
        }
        let k_plus_first = store.store_local(entry("p", 20));
        let lowest = store.store_local(entry("p", 10));

        let evicted = evict_overflow(&store, 3).await.unwrap();

        assert_eq!(evicted, Some(k_plus_first));
        assert!(store.contains(&lowest), "Only one entry is removed per call");
        assert_eq!(store.len(), 4);
    }

    // ============================================================
    // CONCURRENT SUBMISSIONS
    // ============================================================

    /// Lines concurrent submissions up so that every insert lands before any read,
    /// and every read happens before any delete.
    struct GatedScoreStore {
        inner: Arc<MemoryScoreStore>,
        read_gate: Barrier,
        delete_gate: Barrier,
    }

    #[async_trait]
    impl ScoreStore for GatedScoreStore {
        async fn insert(&self, entry: &ScoreEntry) -> StoreResult<StoreRef> {
            self.inner.insert(entry).await
        }

        async fn top(&self, limit: usize) -> StoreResult<Vec<StoredScore>> {
            self.read_gate.wait().await;
            self.inner.top(limit).await
        }

        async fn delete(&self, reference: &StoreRef) -> StoreResult<()> {
            self.delete_gate.wait().await;
            self.inner.delete(reference).await
        }

        fn name(&self) -> &str {
            "gated"
        }
    }

    #[tokio::test]
    async fn test_racing_submits_may_leave_one_extra_entry() {
        let inner = Arc::new(MemoryScoreStore::new());
        for (name, score) in [("A", 100), ("B", 90), ("C", 80)] {
            inner.store_local(entry(name, score));
        }
        let leaderboard = Leaderboard::new(StoreBackend::available(GatedScoreStore {
            inner: inner.clone(),
            read_gate: Barrier::new(2),
            delete_gate: Barrier::new(2),
        }));

        let (first, second) = tokio::join!(
            leaderboard.submit(entry("D", 70), 3),
            leaderboard.submit(entry("E", 60), 3),
        );
        let (first, second) = (first.unwrap(), second.unwrap());

        // Both saw [100, 90, 80, 70] and both deleted D.
        assert_eq!(first.evicted, Some(first.reference.clone()));
        assert_eq!(second.evicted, Some(first.reference));
        assert_eq!(inner.len(), 4, "Collection is left at K+1");

        let top: Vec<i64> = inner.ranked().iter().map(|s| s.entry.score).collect();
        assert_eq!(top, vec![100, 90, 80, 60]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_burst_stays_between_k_and_k_plus_c_and_keeps_true_top() {
        const K: usize = 5;
        const BURST: usize = 16;

        let (store, leaderboard) = memory_leaderboard();
        let leaderboard = Arc::new(leaderboard);

        let seeds: Vec<i64> = vec![15, 25, 35, 45, 55];
        for score in &seeds {
            store.store_local(entry("seed", *score));
        }

        // Even, pairwise distinct, and disjoint from the odd seeds.
        let submitted: Vec<i64> = (0..BURST as i64).map(|i| (i * 37 % 101) * 2).collect();

        let handles: Vec<_> = submitted
            .iter()
            .map(|score| {
                let leaderboard = leaderboard.clone();
                let score = *score;
                tokio::spawn(async move { leaderboard.submit(entry("burst", score), K).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let remaining = store.len();
        assert!(remaining >= K, "Never fewer than K, got {}", remaining);
        assert!(remaining <= K + BURST, "At most K + c, got {}", remaining);

        let mut expected: Vec<i64> = seeds.iter().chain(submitted.iter()).copied().collect();
        expected.sort_unstable_by(|a, b| b.cmp(a));
        expected.truncate(K);
        let listed = leaderboard.list_top(K).await.unwrap();
        assert_eq!(score_list(&listed), expected, "The true top K survives any race");

        leaderboard.prune(K).await.unwrap();
        assert_eq!(store.len(), K);
    }

    // ============================================================
    // PRUNE & SWEEPER
    // ============================================================

    #[tokio::test]
    async fn test_prune_removes_everything_past_k_in_batches() {
        let (store, leaderboard) = memory_leaderboard();
        for score in 0..250 {
            store.store_local(entry("p", score));
        }

        let deleted = leaderboard.prune(10).await.unwrap();

        assert_eq!(deleted, 240);
        assert_eq!(store.len(), 10);
        let top = leaderboard.list_top(10).await.unwrap();
        assert_eq!(score_list(&top), (240..250).rev().collect::<Vec<i64>>());
    }

    #[tokio::test]
    async fn test_prune_within_bound_deletes_nothing() {
        let (store, leaderboard) = memory_leaderboard();
        store.store_local(entry("p", 1));

        assert_eq!(leaderboard.prune(10).await.unwrap(), 0);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_sweeper_converges_to_k() {
        let (store, leaderboard) = memory_leaderboard();
        for score in 0..8 {
            store.store_local(entry("p", score));
        }

        let handle = spawn_sweeper(Arc::new(leaderboard), 3, Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(200)).await;
        handle.abort();

        assert_eq!(store.len(), 3);
    }

    // ============================================================
    // PROPERTIES
    // ============================================================

    proptest! {
        #[test]
        fn prop_list_top_returns_min_n_k_sorted(
            scores in proptest::collection::vec(-1000i64..1000, 0..40),
            k in 1usize..15,
        ) {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let listed = runtime.block_on(async {
                let (store, leaderboard) = memory_leaderboard();
                for score in &scores {
                    store.store_local(entry("p", *score));
                }
                leaderboard.list_top(k).await.unwrap()
            });

            prop_assert_eq!(listed.len(), scores.len().min(k));

            let mut expected = scores.clone();
            expected.sort_unstable_by(|a, b| b.cmp(a));
            expected.truncate(k);
            prop_assert_eq!(score_list(&listed), expected);
        }

        #[test]
        fn prop_sequential_submits_keep_exactly_top_k(
            scores in proptest::collection::vec(-1000i64..1000, 0..30),
            k in 1usize..8,
        ) {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let (listed, remaining) = runtime.block_on(async {
                let (store, leaderboard) = memory_leaderboard();
                for score in &scores {
                    leaderboard.submit(entry("p", *score), k).await.unwrap();
                }
                (leaderboard.list_top(k).await.unwrap(), store.len())
            });

            prop_assert_eq!(remaining, scores.len().min(k));

            let mut expected = scores.clone();
            expected.sort_unstable_by(|a, b| b.cmp(a));
            expected.truncate(k);
            prop_assert_eq!(score_list(&listed), expected);
        }
    }
}
