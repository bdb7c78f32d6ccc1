use super::error::ApiError;
use super::protocol::*;
use crate::leaderboard::maintainer::Leaderboard;
use crate::leaderboard::types::{LeaderboardError, ScoreEntry};

use axum::extract::rejection::JsonRejection;
use axum::{Extension, Json};
use std::sync::Arc;

/// Shared state handed to every handler.
pub struct ApiState {
    pub leaderboard: Arc<Leaderboard>,
    /// K.
    pub leaderboard_size: usize,
}

pub async fn handle_root() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "online".to_string(),
        message: ROOT_MESSAGE.to_string(),
    })
}

pub async fn handle_list_scores(
    Extension(state): Extension<Arc<ApiState>>,
) -> Result<Json<Vec<ScoreEntry>>, ApiError> {
    let scores = state
        .leaderboard
        .list_top(state.leaderboard_size)
        .await?;

    Ok(Json(scores))
}

pub async fn handle_submit_score(
    Extension(state): Extension<Arc<ApiState>>,
    payload: Result<Json<ScoreEntry>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(entry) = payload.map_err(|rejection| {
        tracing::debug!("Rejected score submission: {}", rejection);
        ApiError::MalformedPayload(rejection.body_text())
    })?;

    match state
        .leaderboard
        .submit(entry, state.leaderboard_size)
        .await
    {
        Ok(_) => {}
        // The score is persisted; only the trim step failed.
        Err(LeaderboardError::MaintenanceFailed { reference, reason }) => {
            tracing::warn!(
                "Score {} saved but leaderboard maintenance failed: {}",
                reference.0,
                reason
            );
        }
        Err(e) => return Err(e.into()),
    }

    Ok(Json(MessageResponse {
        message: SCORE_SAVED_MESSAGE.to_string(),
    }))
}
