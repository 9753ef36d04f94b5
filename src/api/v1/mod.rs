//! Chemistry v1 API endpoints

pub mod quiz;
pub mod reactions;
pub mod solve;

use axum::{routing::post, Router};

use super::state::AppState;

/// Create v1 API router
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/quiz", post(quiz::generate_quiz))
        .route("/reactions", post(reactions::find_reactions))
        .route("/solve", post(solve::solve_problem))
}
