//! HTTP API Module
//!
//! The public REST surface of the leaderboard.
//!
//! | Method | Path      | Success                                   |
//! |--------|-----------|-------------------------------------------|
//! | GET    | `/`       | `{"status":"online","message":...}`       |
//! | GET    | `/scores` | array of `{playerName, score}`, best first |
//! | POST   | `/scores` | `{"message":"Score saved successfully"}`  |
//!
//! Failures carry a `{"detail": ...}` body: 503 when the database is unavailable,
//! 422 for malformed request bodies, 500 for everything else.
//!
//! ## Submodules
//! - **`handlers`**: Axum request handlers.
//! - **`router`**: Route table, CORS and request tracing.
//! - **`error`**: Mapping of leaderboard errors onto status codes.
//! - **`protocol`**: Endpoint paths and response DTOs.

pub mod error;
pub mod handlers;
pub mod protocol;
pub mod router;
