//! Quiz generation endpoint handler

use axum::extract::State;
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, QuizRequest};
use crate::domain::chemistry::{QuizPayload, QuizTask};
use crate::domain::CompletionExtras;

/// POST /v1/quiz
///
/// A malformed completion is reported with the offending text in `raw`, so the
/// client can show what the model produced.
pub async fn generate_quiz(
    State(state): State<AppState>,
    Json(request): Json<QuizRequest>,
) -> Result<Json<QuizPayload>, ApiError> {
    let chapter_content = request
        .chapter_content
        .ok_or_else(|| ApiError::bad_request("chapterContent is required"))?;
    let question_count = request
        .question_count
        .ok_or_else(|| ApiError::bad_request("questionCount is required"))?;

    let task = QuizTask::new(
        chapter_content,
        question_count,
        request.difficulty.unwrap_or_default(),
    )?
    .with_book_title(request.book_title)
    .with_chapter_title(request.chapter_title);

    info!(
        question_count = task.question_count(),
        difficulty = %task.difficulty(),
        "Generating quiz"
    );

    let reply = state
        .gateway
        .complete_json::<QuizPayload>(&task.prompt(), &CompletionExtras::json())
        .await?;

    info!(
        provider = %reply.provider,
        questions = reply.payload.questions.len(),
        "Quiz generated"
    );

    Ok(Json(reply.payload.truncate(task.question_count())))
}
