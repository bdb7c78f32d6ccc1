use super::maintainer::Leaderboard;

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Spawns a task that prunes the collection back to `k` entries every `period`.
///
/// Submissions that race can leave a few entries past K behind; the sweep removes
/// them. Failures are logged and retried on the next tick.
pub fn spawn_sweeper(leaderboard: Arc<Leaderboard>, k: usize, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);

        loop {
            interval.tick().await;

            if !leaderboard.backend().is_available() {
                tracing::debug!("Skipping leaderboard sweep, database not initialized");
                continue;
            }

            match leaderboard.prune(k).await {
                Ok(0) => tracing::debug!("Leaderboard sweep found nothing past {}", k),
                Ok(_) => {}
                Err(e) => tracing::warn!("Leaderboard sweep failed: {}", e),
            }
        }
    })
}
