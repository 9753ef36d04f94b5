//! Gateway configuration: provider priority, fallback policy and endpoints

use serde::Deserialize;
use std::time::Duration;

use crate::domain::ProviderId;
use crate::infrastructure::llm::ProvidersConfig;

/// Fallback chain configuration (`[gateway]`)
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Providers in priority order; highest priority first
    #[serde(default = "default_provider_order")]
    pub provider_order: Vec<ProviderId>,
    #[serde(default)]
    pub policy: FallbackPolicy,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_provider_order() -> Vec<ProviderId> {
    vec![
        ProviderId::GoogleAi,
        ProviderId::Groq,
        ProviderId::OpenRouter,
        ProviderId::OpenAi,
    ]
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            provider_order: default_provider_order(),
            policy: FallbackPolicy::default(),
            providers: ProvidersConfig::default(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl GatewayConfig {
    /// Priority order with duplicates removed, first occurrence wins
    pub fn effective_order(&self) -> Vec<ProviderId> {
        let mut order = Vec::with_capacity(self.provider_order.len());
        for provider in &self.provider_order {
            if !order.contains(provider) {
                order.push(*provider);
            }
        }
        order
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Per-provider timeout and retry budget
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FallbackPolicy {
    #[serde(default = "default_provider_timeout_secs")]
    pub provider_timeout_secs: u64,
    /// 1 means a single call per provider
    #[serde(default = "default_max_attempts")]
    pub max_attempts_per_provider: u32,
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

fn default_provider_timeout_secs() -> u64 {
    30
}

fn default_max_attempts() -> u32 {
    1
}

fn default_initial_backoff_ms() -> u64 {
    250
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self {
            provider_timeout_secs: default_provider_timeout_secs(),
            max_attempts_per_provider: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

impl FallbackPolicy {
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts_per_provider.max(1)
    }

    /// Delay before retry number `retry` (0-based) on the same provider
    pub fn backoff_for_attempt(&self, retry: u32) -> Duration {
        let multiplier = self.backoff_multiplier.max(1.0).powi(retry as i32);
        Duration::from_millis((self.initial_backoff_ms as f64 * multiplier) as u64)
    }
}
