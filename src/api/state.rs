//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::gateway::AiGateway;

/// Application state shared by every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub gateway: Arc<AiGateway>,
}

impl AppState {
    pub fn new(gateway: AiGateway) -> Self {
        Self {
            gateway: Arc::new(gateway),
        }
    }
}
