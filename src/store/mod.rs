//! Score Store Module
//!
//! The persistence layer behind the leaderboard: an ordered collection of score
//! documents supporting insert, descending range query with a limit, and delete by
//! reference.
//!
//! ## Core Concepts
//! - **`ScoreStore`**: The async seam the leaderboard talks to. Every call is one round
//!   trip; there is no caching and no retry.
//! - **`StoreBackend`**: The handle injected into the leaderboard at construction time.
//!   It is either `Available` or explicitly `Unavailable`, so a process without
//!   credentials keeps serving and answers every store call with an error.
//! - **Backends**: `MemoryScoreStore` (local development and tests) and
//!   `FirestoreScoreStore` (Cloud Firestore over its REST API).

pub mod auth;
pub mod backend;
pub mod credentials;
pub mod firestore;
pub mod memory;
pub mod protocol;
pub mod types;

#[cfg(test)]
pub mod testing;
