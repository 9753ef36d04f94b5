//! API request and error types

pub mod chemistry;
pub mod error;
pub mod json;

pub use chemistry::{QuizRequest, ReactionsRequest, SolveRequest};
pub use error::{ApiError, ApiErrorCode, ApiErrorResponse};
pub use json::Json;
