use serde::{Deserialize, Serialize};

use super::schema::{require_text, ResponseSchema};
use crate::domain::llm::PromptPair;
use crate::domain::DomainError;

pub const MAX_SUBSTANCES: usize = 10;

const SYSTEM_PROMPT: &str = "You are a chemistry expert. Given a list of substances, decide \
whether they react with each other under realistic laboratory conditions. Write balanced \
equations. For reactions in aqueous solution between electrolytes also give the net ionic \
equation. Reply with JSON only, no markdown, using this shape: {\"possible\":true,\
\"reactions\":[{\"equation\":\"...\",\"conditions\":\"...\",\"type\":\"...\",\
\"ionicEquation\":\"...\",\"observation\":\"...\",\"explanation\":\"...\",\
\"products\":[\"...\"]}],\"noReactionReason\":null}. When no reaction is possible set \
\"possible\" to false, leave \"reactions\" empty and explain why in \"noReactionReason\".";

/// Validated reaction lookup request
#[derive(Debug, Clone)]
pub struct ReactionTask {
    substances: Vec<String>,
}

impl ReactionTask {
    pub fn new(substances: Vec<String>) -> Result<Self, DomainError> {
        let substances: Vec<String> = substances
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if substances.is_empty() {
            return Err(DomainError::missing_input(
                "substances must contain at least one substance",
            ));
        }

        if substances.len() > MAX_SUBSTANCES {
            return Err(DomainError::missing_input(format!(
                "substances must contain at most {} entries",
                MAX_SUBSTANCES
            )));
        }

        Ok(Self { substances })
    }

    pub fn substances(&self) -> &[String] {
        &self.substances
    }

    pub fn prompt(&self) -> PromptPair {
        let user = if self.substances.len() == 1 {
            format!(
                "Substance: {}\nDescribe its characteristic reactions (decomposition, \
                 reaction with water, oxygen, acids or bases).",
                self.substances[0]
            )
        } else {
            format!(
                "Substances: {}\nWhich reactions between them are possible?",
                self.substances.join(", ")
            )
        };

        PromptPair::new(SYSTEM_PROMPT, user)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub equation: String,
    pub conditions: String,
    #[serde(rename = "type")]
    pub reaction_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ionic_equation: Option<String>,
    pub observation: String,
    pub explanation: String,
    pub products: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionPayload {
    pub possible: bool,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_reaction_reason: Option<String>,
}

impl ResponseSchema for ReactionPayload {
    const NAME: &'static str = "reactions";

    fn validate(mut self) -> Result<Self, String> {
        if self.possible && self.reactions.is_empty() {
            return Err("'possible' is true but no reactions were listed".to_string());
        }

        for (i, r) in self.reactions.iter_mut().enumerate() {
            let n = i + 1;
            require_text(&format!("reactions[{n}].equation"), &r.equation)?;
            require_text(&format!("reactions[{n}].type"), &r.reaction_type)?;

            r.products.retain(|p| !p.trim().is_empty());
            if r.products.is_empty() {
                return Err(format!("reactions[{n}].products must not be empty"));
            }

            if r.ionic_equation.as_deref().is_some_and(|e| e.trim().is_empty()) {
                r.ionic_equation = None;
            }
        }

        if !self.possible {
            self.reactions.clear();
        }

        Ok(self)
    }
}
