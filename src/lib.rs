//! Space Game Leaderboard Library
//!
//! This library crate defines the modules behind the leaderboard backend.
//! It serves as the foundation for the binary executable (`main.rs`).
//!
//! ## Architecture Modules
//! The system is composed of four loosely coupled subsystems:
//!
//! - **`config`**: Runtime settings read from the process environment (bind address,
//!   leaderboard size, store selection and credential sources).
//! - **`store`**: The score store. Defines the `ScoreStore` seam, the `StoreBackend`
//!   handle (which is explicitly `Unavailable` when no database is configured), an
//!   in-memory store and a Firestore REST adapter.
//! - **`leaderboard`**: The bounded top-K maintenance logic. Lists the best scores and
//!   keeps the persisted collection trimmed to K entries after each submission.
//! - **`api`**: The HTTP surface. Translates requests into leaderboard calls and maps
//!   results and errors onto JSON responses and status codes.

pub mod api;
pub mod config;
pub mod leaderboard;
pub mod store;
