use serde::{Deserialize, Serialize};

use super::schema::{require_text, ResponseSchema};
use crate::domain::llm::{CompletionExtras, ImageAttachment, PromptPair};
use crate::domain::DomainError;

const SYSTEM_PROMPT: &str = "You are a patient chemistry tutor helping a school student with \
homework. Solve the problem step by step: list what is given, write the balanced equations \
and formulas you use, show every calculation with units, and finish with a clearly marked \
final answer. Use markdown for structure. If the problem is not about chemistry, say so \
briefly.";

const IMAGE_ONLY_QUESTION: &str = "Solve the chemistry problem shown in the attached image.";

/// Validated free-form homework request
#[derive(Debug, Clone)]
pub struct SolveTask {
    question: Option<String>,
    image: Option<ImageAttachment>,
}

impl SolveTask {
    pub fn new(question: Option<String>, image_data: Option<String>) -> Result<Self, DomainError> {
        let question = question.filter(|q| !q.trim().is_empty());
        let image = image_data
            .filter(|d| !d.trim().is_empty())
            .map(|d| ImageAttachment::from_data_url(&d))
            .transpose()?;

        if question.is_none() && image.is_none() {
            return Err(DomainError::missing_input(
                "either question or imageData is required",
            ));
        }

        Ok(Self { question, image })
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn prompt(&self) -> PromptPair {
        let user = match (&self.question, &self.image) {
            (Some(q), Some(_)) => format!("{}\n\nThe attached image contains the problem.", q),
            (Some(q), None) => q.clone(),
            (None, _) => IMAGE_ONLY_QUESTION.to_string(),
        };

        PromptPair::new(SYSTEM_PROMPT, user)
    }

    /// Solutions are markdown, so the completion is taken as text
    pub fn extras(&self) -> CompletionExtras {
        let extras = CompletionExtras::text();
        match &self.image {
            Some(image) => extras.with_image(image.clone()),
            None => extras,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolvePayload {
    pub solution: String,
}

impl SolvePayload {
    pub fn new(solution: impl Into<String>) -> Self {
        Self {
            solution: solution.into(),
        }
    }
}

impl ResponseSchema for SolvePayload {
    const NAME: &'static str = "solution";

    fn validate(self) -> Result<Self, String> {
        require_text("solution", &self.solution)?;
        Ok(self)
    }
}
