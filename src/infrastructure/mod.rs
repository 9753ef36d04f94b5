//! Infrastructure layer - External service implementations

pub mod credentials;
pub mod gateway;
pub mod llm;
pub mod logging;
pub mod observability;
