//! LLM provider domain models and traits

mod attempt;
mod image;
mod prompt;
mod provider;

pub use attempt::{FallbackOutcome, FallbackState, ProviderAttemptResult};
pub use image::ImageAttachment;
pub use prompt::{CompletionExtras, PromptPair, ResponseFormat};
pub use provider::{ProviderAdapter, ProviderCapabilities, ProviderId};

#[cfg(test)]
pub use provider::mock::MockProviderAdapter;
