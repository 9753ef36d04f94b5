//! Reaction lookup endpoint handler

use axum::extract::State;
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, ReactionsRequest};
use crate::domain::chemistry::{ReactionPayload, ReactionTask};
use crate::domain::CompletionExtras;

/// POST /v1/reactions
pub async fn find_reactions(
    State(state): State<AppState>,
    Json(request): Json<ReactionsRequest>,
) -> Result<Json<ReactionPayload>, ApiError> {
    let substances = request
        .substances
        .ok_or_else(|| ApiError::bad_request("substances is required"))?;
    let task = ReactionTask::new(substances)?;

    info!(substances = ?task.substances(), "Looking up reactions");

    let reply = state
        .gateway
        .complete_json::<ReactionPayload>(&task.prompt(), &CompletionExtras::json())
        .await
        .map_err(|e| ApiError::from(e).without_raw())?;

    info!(
        provider = %reply.provider,
        possible = reply.payload.possible,
        reactions = reply.payload.reactions.len(),
        "Reactions resolved"
    );

    Ok(Json(reply.payload))
}
