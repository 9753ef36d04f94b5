use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::str::FromStr;

use super::{CompletionExtras, PromptPair};
use crate::domain::credentials::ProviderCredentials;
use crate::domain::DomainError;

/// Identifier of an upstream LLM completion API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderId {
    #[serde(alias = "google", alias = "gemini")]
    GoogleAi,
    Groq,
    #[serde(rename = "openrouter")]
    OpenRouter,
    #[serde(rename = "openai")]
    OpenAi,
}

impl ProviderId {
    pub const ALL: [ProviderId; 4] = [
        ProviderId::GoogleAi,
        ProviderId::Groq,
        ProviderId::OpenRouter,
        ProviderId::OpenAi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::GoogleAi => "google_ai",
            ProviderId::Groq => "groq",
            ProviderId::OpenRouter => "openrouter",
            ProviderId::OpenAi => "openai",
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google_ai" | "google" | "gemini" => Ok(ProviderId::GoogleAi),
            "groq" => Ok(ProviderId::Groq),
            "openrouter" => Ok(ProviderId::OpenRouter),
            "openai" => Ok(ProviderId::OpenAi),
            other => Err(DomainError::configuration(format!(
                "Unknown provider: {}",
                other
            ))),
        }
    }
}

/// What an adapter can do beyond plain text prompts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProviderCapabilities {
    pub images: bool,
    pub json_mode: bool,
}

/// Translates a canonical prompt into one provider's wire format and back
#[async_trait]
pub trait ProviderAdapter: Send + Sync + Debug {
    fn id(&self) -> ProviderId;

    fn capabilities(&self) -> ProviderCapabilities;

    /// Returns the completion text as extracted from the provider envelope.
    /// An envelope without the expected field yields an empty string.
    async fn complete(
        &self,
        prompt: &PromptPair,
        credentials: &ProviderCredentials,
        extras: &CompletionExtras,
    ) -> Result<String, DomainError>;
}
