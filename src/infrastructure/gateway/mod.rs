//! AI provider gateway: fallback chain, response normalization and the service used by handlers

mod config;
pub mod normalizer;
mod orchestrator;
mod service;

pub use config::{FallbackPolicy, GatewayConfig};
pub use orchestrator::FallbackOrchestrator;
pub use service::{AiGateway, GatewayReply, ProviderStatus};
