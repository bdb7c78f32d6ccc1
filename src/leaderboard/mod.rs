//! Leaderboard Module
//!
//! Maintains a persisted score collection bounded to its best K entries.
//!
//! ## Protocol
//! 1. **List**: `list_top(k)` reads the K highest scores, best first. Equal scores are
//!    ordered however the store orders them; insertion order is not guaranteed.
//! 2. **Submit**: `submit(entry, k)` always inserts the entry, then reads the top K+1
//!    and deletes the (K+1)-th entry if there is one.
//! 3. **Prune**: `prune(k)` deletes everything ranked beyond K. A background sweeper
//!    runs it periodically.
//!
//! ## Consistency
//! No transaction guards the collection. Concurrent submissions can each observe the
//! same K+1 entries and delete the same one, leaving more than K entries behind until
//! the next sweep. Each submission inserts one entry and deletes at most one, and the
//! deleted entry always has K entries ranked above it in the deleting call's view, so
//! the collection never drops below K once K scores exist and the true top K is never
//! evicted.
//!
//! ## Submodules
//! - **`maintainer`**: The `Leaderboard` service and the isolated `evict_overflow` step.
//! - **`sweeper`**: Background task running `prune` on an interval.
//! - **`types`**: `ScoreEntry`, outcomes and the error taxonomy.

pub mod maintainer;
pub mod sweeper;
pub mod types;

#[cfg(test)]
mod tests;
