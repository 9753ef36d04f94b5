use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::http_client::HttpClientTrait;
use crate::domain::{
    CompletionExtras, DomainError, PromptPair, ProviderAdapter, ProviderCapabilities,
    ProviderCredentials, ProviderId,
};

/// Endpoint settings for one OpenAI-compatible provider (Groq, OpenRouter, OpenAI)
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleConfig {
    pub provider_id: ProviderId,
    /// Base URL including the API version prefix, e.g. `https://api.groq.com/openai/v1`
    pub base_url: String,
    pub model: String,
    pub capabilities: ProviderCapabilities,
}

impl OpenAiCompatibleConfig {
    pub fn new(provider_id: ProviderId, base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider_id,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            capabilities: ProviderCapabilities::default(),
        }
    }

    pub fn with_capabilities(mut self, capabilities: ProviderCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }
}

/// Chat-completions adapter shared by every OpenAI-compatible API
#[derive(Debug)]
pub struct OpenAiCompatibleAdapter<C: HttpClientTrait> {
    client: C,
    config: OpenAiCompatibleConfig,
}

impl<C: HttpClientTrait> OpenAiCompatibleAdapter<C> {
    pub fn new(client: C, config: OpenAiCompatibleConfig) -> Self {
        Self { client, config }
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    fn build_request(&self, prompt: &PromptPair, extras: &CompletionExtras) -> serde_json::Value {
        let user_content = match &extras.image {
            Some(image) if self.config.capabilities.images => UserContent::Parts(vec![
                ContentPart::Text {
                    text: prompt.user().to_string(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image.to_data_url(),
                    },
                },
            ]),
            _ => UserContent::Text(prompt.user().to_string()),
        };

        let messages = vec![
            ChatMessage {
                role: "system",
                content: UserContent::Text(prompt.system().to_string()),
            },
            ChatMessage {
                role: "user",
                content: user_content,
            },
        ];

        let mut body = serde_json::json!({
            "model": self.config.model,
            "messages": messages,
        });

        if extras.expects_json() && self.config.capabilities.json_mode {
            body["response_format"] = serde_json::json!({"type": "json_object"});
        }

        body
    }

    fn extract_text(&self, json: serde_json::Value) -> String {
        let response: ChatResponse = match serde_json::from_value(json) {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(
                    provider = %self.config.provider_id,
                    error = %e,
                    "Unexpected chat completion envelope"
                );
                return String::new();
            }
        };

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_default()
    }
}

#[async_trait]
impl<C: HttpClientTrait> ProviderAdapter for OpenAiCompatibleAdapter<C> {
    fn id(&self) -> ProviderId {
        self.config.provider_id
    }

    fn capabilities(&self) -> ProviderCapabilities {
        self.config.capabilities
    }

    async fn complete(
        &self,
        prompt: &PromptPair,
        credentials: &ProviderCredentials,
        extras: &CompletionExtras,
    ) -> Result<String, DomainError> {
        let provider = self.config.provider_id.as_str();
        let api_key = credentials
            .api_key()
            .ok_or_else(|| DomainError::credential(format!("No API key for {}", provider)))?;

        let auth_header = format!("Bearer {}", api_key);
        let headers = vec![
            ("Authorization", auth_header.as_str()),
            ("Content-Type", "application/json"),
        ];

        let url = self.chat_completions_url();
        let body = self.build_request(prompt, extras);
        let response = self.client.post_json(provider, &url, headers, &body).await?;

        Ok(self.extract_text(response))
    }
}

// Chat completions wire types

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: UserContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum UserContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}
