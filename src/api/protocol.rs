//! API Protocol
//!
//! Endpoint paths and the JSON bodies returned to game clients. Score entries
//! themselves are serialized directly from `ScoreEntry`.

use serde::{Deserialize, Serialize};

// --- API Endpoints ---

/// Liveness endpoint.
pub const ENDPOINT_ROOT: &str = "/";
/// Leaderboard listing (GET) and submission (POST).
pub const ENDPOINT_SCORES: &str = "/scores";

pub const ROOT_MESSAGE: &str = "Space Game Backend is Running";
pub const SCORE_SAVED_MESSAGE: &str = "Score saved successfully";

// --- Data Transfer Objects ---

/// Body of `GET /`.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
}

/// Confirmation returned after a submission.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Body of every error response. Only the error's message is exposed.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}
