use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;

use super::gemini::{GeminiAdapter, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};
use super::http_client::HttpClient;
use super::openai_compatible::{OpenAiCompatibleAdapter, OpenAiCompatibleConfig};
use crate::domain::{ProviderAdapter, ProviderCapabilities, ProviderId};

/// Base URL and model for one provider
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ProviderEndpoint {
    pub base_url: String,
    pub model: String,
}

impl ProviderEndpoint {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
        }
    }
}

/// Per-provider endpoint overrides (`[gateway.providers.*]`)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub google_ai: ProviderEndpoint,
    pub groq: ProviderEndpoint,
    pub openrouter: ProviderEndpoint,
    pub openai: ProviderEndpoint,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            google_ai: ProviderEndpoint::new(DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL),
            groq: ProviderEndpoint::new(
                "https://api.groq.com/openai/v1",
                "llama-3.3-70b-versatile",
            ),
            openrouter: ProviderEndpoint::new(
                "https://openrouter.ai/api/v1",
                "google/gemini-2.0-flash-001",
            ),
            openai: ProviderEndpoint::new("https://api.openai.com/v1", "gpt-4o-mini"),
        }
    }
}

impl ProvidersConfig {
    pub fn endpoint(&self, provider: ProviderId) -> &ProviderEndpoint {
        match provider {
            ProviderId::GoogleAi => &self.google_ai,
            ProviderId::Groq => &self.groq,
            ProviderId::OpenRouter => &self.openrouter,
            ProviderId::OpenAi => &self.openai,
        }
    }
}

/// Adapters available to the fallback chain, keyed by provider
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    adapters: HashMap<ProviderId, Arc<dyn ProviderAdapter>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build one adapter per known provider sharing a single HTTP connection pool
    pub fn from_config(config: &ProvidersConfig, client: HttpClient) -> Self {
        let mut registry = Self::new();

        for provider in ProviderId::ALL {
            let endpoint = config.endpoint(provider);
            let adapter: Arc<dyn ProviderAdapter> = match provider {
                ProviderId::GoogleAi => Arc::new(GeminiAdapter::with_base_url(
                    client.clone(),
                    &endpoint.base_url,
                    &endpoint.model,
                )),
                _ => Arc::new(OpenAiCompatibleAdapter::new(
                    client.clone(),
                    OpenAiCompatibleConfig::new(provider, &endpoint.base_url, &endpoint.model)
                        .with_capabilities(openai_compatible_capabilities(provider)),
                )),
            };

            registry.register(adapter);
        }

        registry
    }

    pub fn with_adapter(mut self, adapter: Arc<dyn ProviderAdapter>) -> Self {
        self.register(adapter);
        self
    }

    pub fn register(&mut self, adapter: Arc<dyn ProviderAdapter>) {
        self.adapters.insert(adapter.id(), adapter);
    }

    pub fn get(&self, provider: ProviderId) -> Option<Arc<dyn ProviderAdapter>> {
        self.adapters.get(&provider).cloned()
    }

    pub fn contains(&self, provider: ProviderId) -> bool {
        self.adapters.contains_key(&provider)
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

fn openai_compatible_capabilities(provider: ProviderId) -> ProviderCapabilities {
    match provider {
        // Groq's hosted Llama models are text-only
        ProviderId::Groq => ProviderCapabilities {
            images: false,
            json_mode: true,
        },
        ProviderId::OpenRouter => ProviderCapabilities {
            images: true,
            json_mode: false,
        },
        ProviderId::OpenAi | ProviderId::GoogleAi => ProviderCapabilities {
            images: true,
            json_mode: true,
        },
    }
}
