//! Chemistry tasks served by the gateway: request rules, prompts and response schemas

mod quiz;
mod reaction;
mod schema;
mod solve;

pub use quiz::{
    Difficulty, QuizOptions, QuizPayload, QuizQuestion, QuizTask, MAX_CHAPTER_CHARS, MAX_QUESTIONS,
};
pub use reaction::{Reaction, ReactionPayload, ReactionTask, MAX_SUBSTANCES};
pub use schema::ResponseSchema;
pub use solve::{SolvePayload, SolveTask};
