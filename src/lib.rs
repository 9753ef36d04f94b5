//! ChemLab AI Gateway
//!
//! Backend for a chemistry learning app. Three AI features share one provider chain:
//! - Quiz generation from chapter text (`POST /v1/quiz`)
//! - Reaction lookup for a set of substances (`POST /v1/reactions`)
//! - Homework solving from text and/or a photo (`POST /v1/solve`)
//!
//! Each request walks the configured providers (Gemini, Groq, OpenRouter, OpenAI) in
//! priority order and returns the first usable completion.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use api::state::AppState;
use domain::EnvSnapshot;
use infrastructure::credentials::{CredentialResolver, SettingsStoreFactory};
use infrastructure::gateway::{AiGateway, FallbackOrchestrator};
use infrastructure::llm::{HttpClient, ProviderRegistry};
use tracing::info;

/// Create the application state from configuration and a snapshot of the environment.
/// No network connection is opened here; the settings database pool connects lazily.
pub fn create_app_state_with_config(
    config: &AppConfig,
    env: EnvSnapshot,
) -> anyhow::Result<AppState> {
    let client = HttpClient::with_connect_timeout(config.gateway.connect_timeout())?;
    let registry = ProviderRegistry::from_config(&config.gateway.providers, client);

    let store = SettingsStoreFactory::create(&config.settings, env.get("DATABASE_URL"))?;
    info!(
        backend = ?config.settings.backend,
        store = store.as_ref().map(|s| s.store_name()).unwrap_or("none"),
        "Settings store configured"
    );

    let resolver = CredentialResolver::new(env, store);
    let orchestrator = FallbackOrchestrator::new(registry, config.gateway.policy.clone());
    let gateway = AiGateway::new(resolver, orchestrator, config.gateway.effective_order());

    Ok(AppState::new(gateway))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProviderId;
    use crate::infrastructure::credentials::SettingsBackend;

    #[tokio::test]
    async fn test_default_config_builds_full_chain() {
        let env = EnvSnapshot::default().with_var("GROQ_API_KEY", "gsk-test");

        let state = create_app_state_with_config(&AppConfig::default(), env).unwrap();

        assert_eq!(
            state.gateway.provider_order(),
            &[
                ProviderId::GoogleAi,
                ProviderId::Groq,
                ProviderId::OpenRouter,
                ProviderId::OpenAi
            ]
        );

        let status = state.gateway.provider_status().await;
        assert!(!status[0].has_key);
        assert!(status[1].has_key);
    }

    #[tokio::test]
    async fn test_memory_settings_supply_missing_keys() {
        let mut config = AppConfig::default();
        config.settings.backend = SettingsBackend::Memory;
        config
            .settings
            .values
            .insert("openai_api_key".to_string(), "sk-test".to_string());

        let state = create_app_state_with_config(&config, EnvSnapshot::default()).unwrap();
        let status = state.gateway.provider_status().await;

        let openai = status
            .iter()
            .find(|s| s.provider == ProviderId::OpenAi)
            .unwrap();
        assert!(openai.has_key);
    }

    #[test]
    fn test_postgres_settings_without_url_fails() {
        let mut config = AppConfig::default();
        config.settings.backend = SettingsBackend::Postgres;

        assert!(create_app_state_with_config(&config, EnvSnapshot::default()).is_err());
    }
}
