//! Request bodies for the chemistry endpoints.
//!
//! Required fields are optional here so that a missing field is reported as a
//! `missing_input` error by the domain rules instead of a generic JSON rejection.

use serde::Deserialize;

use crate::domain::chemistry::Difficulty;

/// POST /v1/quiz
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizRequest {
    #[serde(default)]
    pub book_title: Option<String>,
    #[serde(default)]
    pub chapter_title: Option<String>,
    #[serde(default)]
    pub chapter_content: Option<String>,
    #[serde(default)]
    pub question_count: Option<u32>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

/// POST /v1/reactions
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReactionsRequest {
    #[serde(default)]
    pub substances: Option<Vec<String>>,
}

/// POST /v1/solve
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveRequest {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub image_data: Option<String>,
}
