use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::http_client::HttpClientTrait;
use crate::domain::{
    CompletionExtras, DomainError, PromptPair, ProviderAdapter, ProviderCapabilities,
    ProviderCredentials, ProviderId,
};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Google AI (Gemini `generateContent`) adapter
#[derive(Debug)]
pub struct GeminiAdapter<C: HttpClientTrait> {
    client: C,
    base_url: String,
    model: String,
}

impl<C: HttpClientTrait> GeminiAdapter<C> {
    pub fn new(client: C) -> Self {
        Self::with_base_url(client, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL)
    }

    pub fn with_base_url(
        client: C,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    fn generate_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn build_request(&self, prompt: &PromptPair, extras: &CompletionExtras) -> serde_json::Value {
        let mut parts = vec![GeminiPart::Text {
            text: prompt.user().to_string(),
        }];

        if let Some(image) = &extras.image {
            parts.push(GeminiPart::InlineData {
                inline_data: InlineData {
                    mime_type: image.media_type().to_string(),
                    data: image.data().to_string(),
                },
            });
        }

        let mut body = serde_json::json!({
            "systemInstruction": {
                "parts": [{"text": prompt.system()}]
            },
            "contents": [{
                "role": "user",
                "parts": parts,
            }],
        });

        if extras.expects_json() {
            body["generationConfig"] = serde_json::json!({
                "responseMimeType": "application/json"
            });
        }

        body
    }

    fn extract_text(json: serde_json::Value) -> String {
        let response: GeminiResponse = match serde_json::from_value(json) {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(error = %e, "Unexpected Gemini envelope");
                return String::new();
            }
        };

        response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl<C: HttpClientTrait> ProviderAdapter for GeminiAdapter<C> {
    fn id(&self) -> ProviderId {
        ProviderId::GoogleAi
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            images: true,
            json_mode: true,
        }
    }

    async fn complete(
        &self,
        prompt: &PromptPair,
        credentials: &ProviderCredentials,
        extras: &CompletionExtras,
    ) -> Result<String, DomainError> {
        let provider = ProviderId::GoogleAi.as_str();
        let api_key = credentials
            .api_key()
            .ok_or_else(|| DomainError::credential(format!("No API key for {}", provider)))?;

        let headers = vec![
            ("x-goog-api-key", api_key),
            ("Content-Type", "application/json"),
        ];

        let url = self.generate_url();
        let body = self.build_request(prompt, extras);
        let response = self.client.post_json(provider, &url, headers, &body).await?;

        Ok(Self::extract_text(response))
    }
}

// Gemini API types

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum GeminiPart {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ImageAttachment;
    use crate::infrastructure::llm::http_client::mock::MockHttpClient;

    const TEST_URL: &str =
        "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";

    fn credentials() -> ProviderCredentials {
        ProviderCredentials::new(ProviderId::GoogleAi, Some("AIza-test".to_string()))
    }

    fn prompt() -> PromptPair {
        PromptPair::new("You are a chemistry tutor", "Balance Fe + O2")
    }

    fn reply(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": text}]},
                "finishReason": "STOP"
            }]
        })
    }

    #[tokio::test]
    async fn test_complete_extracts_candidate_text() {
        let client = MockHttpClient::new().with_response(TEST_URL, reply("4Fe + 3O2 -> 2Fe2O3"));
        let adapter = GeminiAdapter::new(client);

        let text = adapter
            .complete(&prompt(), &credentials(), &CompletionExtras::text())
            .await
            .unwrap();

        assert_eq!(text, "4Fe + 3O2 -> 2Fe2O3");
        assert_eq!(
            adapter.client.last_header(TEST_URL, "x-goog-api-key").as_deref(),
            Some("AIza-test")
        );
    }

    #[tokio::test]
    async fn test_request_shape_for_json_with_image() {
        let client = MockHttpClient::new().with_response(TEST_URL, reply("{}"));
        let adapter = GeminiAdapter::new(client);
        let image = ImageAttachment::from_data_url("data:image/jpeg;base64,aGVsbG8=").unwrap();

        adapter
            .complete(&prompt(), &credentials(), &CompletionExtras::json().with_image(image))
            .await
            .unwrap();

        let body = adapter.client.last_body(TEST_URL).unwrap();
        assert_eq!(
            body["systemInstruction"]["parts"][0]["text"],
            "You are a chemistry tutor"
        );
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Balance Fe + O2");
        assert_eq!(
            body["contents"][0]["parts"][1]["inline_data"]["mime_type"],
            "image/jpeg"
        );
        assert_eq!(body["contents"][0]["parts"][1]["inline_data"]["data"], "aGVsbG8=");
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[tokio::test]
    async fn test_multiple_parts_are_joined() {
        let response = serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "Step 1. "}, {"text": "Step 2."}]}}]
        });
        let client = MockHttpClient::new().with_response(TEST_URL, response);
        let adapter = GeminiAdapter::new(client);

        let text = adapter
            .complete(&prompt(), &credentials(), &CompletionExtras::text())
            .await
            .unwrap();

        assert_eq!(text, "Step 1. Step 2.");
    }

    #[tokio::test]
    async fn test_blocked_prompt_yields_empty_text() {
        let response = serde_json::json!({"promptFeedback": {"blockReason": "SAFETY"}});
        let client = MockHttpClient::new().with_response(TEST_URL, response);
        let adapter = GeminiAdapter::new(client);

        let text = adapter
            .complete(&prompt(), &credentials(), &CompletionExtras::json())
            .await
            .unwrap();

        assert!(text.is_empty());
    }

    #[tokio::test]
    async fn test_custom_base_url_and_model() {
        let url = "http://localhost:9000/v1beta/models/gemini-1.5-pro:generateContent";
        let client = MockHttpClient::new().with_response(url, reply("ok"));
        let adapter =
            GeminiAdapter::with_base_url(client, "http://localhost:9000/v1beta/", "gemini-1.5-pro");

        let text = adapter
            .complete(&prompt(), &credentials(), &CompletionExtras::text())
            .await
            .unwrap();

        assert_eq!(text, "ok");
    }
}
