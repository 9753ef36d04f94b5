//! Domain layer - Core business logic and entities

pub mod chemistry;
pub mod credentials;
pub mod error;
pub mod llm;

pub use credentials::{CredentialKey, EnvSnapshot, ProviderCredentials, SettingsStore};
pub use error::DomainError;
pub use llm::{
    CompletionExtras, FallbackOutcome, FallbackState, ImageAttachment, PromptPair,
    ProviderAdapter, ProviderAttemptResult, ProviderCapabilities, ProviderId, ResponseFormat,
};
