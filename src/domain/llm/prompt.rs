use serde::{Deserialize, Serialize};

use super::ImageAttachment;

/// Provider-agnostic prompt: one system instruction and one user turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptPair {
    system: String,
    user: String,
}

impl PromptPair {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }

    pub fn system(&self) -> &str {
        &self.system
    }

    pub fn user(&self) -> &str {
        &self.user
    }
}

/// Shape the caller expects the completion text to have
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    #[default]
    Json,
    Text,
}

/// Optional inputs that travel next to the prompt
#[derive(Debug, Clone, Default)]
pub struct CompletionExtras {
    pub image: Option<ImageAttachment>,
    pub format: ResponseFormat,
}

impl CompletionExtras {
    pub fn json() -> Self {
        Self {
            image: None,
            format: ResponseFormat::Json,
        }
    }

    pub fn text() -> Self {
        Self {
            image: None,
            format: ResponseFormat::Text,
        }
    }

    pub fn with_image(mut self, image: ImageAttachment) -> Self {
        self.image = Some(image);
        self
    }

    pub fn expects_json(&self) -> bool {
        self.format == ResponseFormat::Json
    }
}
