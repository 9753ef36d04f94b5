//! Homework solver endpoint handler

use axum::extract::State;
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, SolveRequest};
use crate::domain::chemistry::{ResponseSchema, SolvePayload, SolveTask};

/// POST /v1/solve
pub async fn solve_problem(
    State(state): State<AppState>,
    Json(request): Json<SolveRequest>,
) -> Result<Json<SolvePayload>, ApiError> {
    let task = SolveTask::new(request.question, request.image_data)?;

    info!(has_image = task.has_image(), "Solving homework problem");

    let reply = state
        .gateway
        .complete_text(&task.prompt(), &task.extras())
        .await
        .map_err(|e| ApiError::from(e).without_raw())?;

    let payload = SolvePayload::new(reply.payload)
        .validate()
        .map_err(ApiError::internal)?;

    info!(provider = %reply.provider, "Solution generated");

    Ok(Json(payload))
}
