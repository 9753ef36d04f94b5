use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{CredentialKey, EnvSnapshot, ProviderCredentials, ProviderId, SettingsStore};

/// Resolves provider API keys for a single request.
///
/// The environment snapshot is consulted first under each provider's canonical name and
/// aliases. Providers still missing a key are then looked up in the settings store with one
/// batched query. Nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct CredentialResolver {
    env: EnvSnapshot,
    store: Option<Arc<dyn SettingsStore>>,
}

impl CredentialResolver {
    pub fn new(env: EnvSnapshot, store: Option<Arc<dyn SettingsStore>>) -> Self {
        Self { env, store }
    }

    pub fn env_only(env: EnvSnapshot) -> Self {
        Self::new(env, None)
    }

    /// One entry per provider in `order`, in the same order
    pub async fn resolve(&self, order: &[ProviderId]) -> Vec<ProviderCredentials> {
        let mut resolved: Vec<(ProviderId, Option<String>)> = order
            .iter()
            .map(|&provider| (provider, self.from_env(provider)))
            .collect();

        let missing_names: Vec<String> = resolved
            .iter()
            .filter(|(_, key)| key.is_none())
            .flat_map(|(provider, _)| {
                CredentialKey::for_provider(*provider)
                    .names()
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect();

        if !missing_names.is_empty() {
            if let Some(store) = &self.store {
                let stored = self.fetch_stored(store.as_ref(), &missing_names).await;

                for (provider, key) in resolved.iter_mut().filter(|(_, key)| key.is_none()) {
                    *key = first_present(*provider, |name| stored.get(name).map(String::as_str));
                }
            }
        }

        resolved
            .into_iter()
            .map(|(provider, key)| ProviderCredentials::new(provider, key))
            .collect()
    }

    fn from_env(&self, provider: ProviderId) -> Option<String> {
        first_present(provider, |name| self.env.get(name))
    }

    async fn fetch_stored(
        &self,
        store: &dyn SettingsStore,
        names: &[String],
    ) -> HashMap<String, String> {
        match store.get_many(names).await {
            Ok(values) => {
                debug!(
                    store = store.store_name(),
                    requested = names.len(),
                    found = values.len(),
                    "Looked up provider keys in settings store"
                );
                values
            }
            Err(e) => {
                warn!(
                    store = store.store_name(),
                    error = %e,
                    "Settings store lookup failed, continuing without stored keys"
                );
                HashMap::new()
            }
        }
    }
}

fn first_present<'a>(
    provider: ProviderId,
    lookup: impl Fn(&str) -> Option<&'a str>,
) -> Option<String> {
    CredentialKey::for_provider(provider)
        .names()
        .filter_map(|name| lookup(name))
        .find(|value| !value.trim().is_empty())
        .map(|value| value.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::credentials::MockSettingsStore;
    use crate::domain::DomainError;

    fn stored(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_env_only_resolution_keeps_order() {
        let env = EnvSnapshot::default()
            .with_var("GROQ_API_KEY", "gsk-1")
            .with_var("GEMINI_API_KEY", "AIza-1");
        let resolver = CredentialResolver::env_only(env);

        let creds = resolver
            .resolve(&[ProviderId::GoogleAi, ProviderId::Groq, ProviderId::OpenAi])
            .await;

        assert_eq!(creds.len(), 3);
        assert_eq!(creds[0].provider_id(), ProviderId::GoogleAi);
        assert_eq!(creds[0].api_key(), Some("AIza-1"));
        assert_eq!(creds[1].api_key(), Some("gsk-1"));
        assert!(!creds[2].is_present());
    }

    #[tokio::test]
    async fn test_canonical_name_wins_over_alias() {
        let env = EnvSnapshot::default()
            .with_var("GOOGLE_AI_API_KEY", "canonical")
            .with_var("GOOGLE_API_KEY", "alias");
        let resolver = CredentialResolver::env_only(env);

        let creds = resolver.resolve(&[ProviderId::GoogleAi]).await;

        assert_eq!(creds[0].api_key(), Some("canonical"));
    }

    #[tokio::test]
    async fn test_store_not_queried_when_env_complete() {
        let env = EnvSnapshot::default().with_var("GROQ_API_KEY", "gsk-1");
        let mut store = MockSettingsStore::new();
        store.expect_get_many().never();

        let resolver = CredentialResolver::new(env, Some(Arc::new(store)));
        let creds = resolver.resolve(&[ProviderId::Groq]).await;

        assert!(creds[0].is_present());
    }

    #[tokio::test]
    async fn test_store_queried_once_for_all_missing_keys() {
        let env = EnvSnapshot::default().with_var("GROQ_API_KEY", "gsk-env");
        let mut store = MockSettingsStore::new();
        store
            .expect_get_many()
            .times(1)
            .withf(|keys| {
                keys.contains(&"GEMINI_API_KEY".to_string())
                    && keys.contains(&"OPENAI_API_KEY".to_string())
                    && !keys.contains(&"GROQ_API_KEY".to_string())
            })
            .returning(|_| {
                Ok(stored(&[
                    ("GEMINI_API_KEY", "AIza-db"),
                    ("OPENAI_API_KEY", "  "),
                ]))
            });
        store.expect_store_name().return_const("mock");

        let resolver = CredentialResolver::new(env, Some(Arc::new(store)));
        let creds = resolver
            .resolve(&[ProviderId::GoogleAi, ProviderId::Groq, ProviderId::OpenAi])
            .await;

        assert_eq!(creds[0].api_key(), Some("AIza-db"));
        assert_eq!(creds[1].api_key(), Some("gsk-env"));
        assert!(!creds[2].is_present());
    }

    #[tokio::test]
    async fn test_store_failure_is_not_fatal() {
        let mut store = MockSettingsStore::new();
        store
            .expect_get_many()
            .times(1)
            .returning(|_| Err(DomainError::storage("connection refused")));
        store.expect_store_name().return_const("mock");

        let resolver = CredentialResolver::new(EnvSnapshot::default(), Some(Arc::new(store)));
        let creds = resolver.resolve(&[ProviderId::Groq, ProviderId::OpenRouter]).await;

        assert_eq!(creds.len(), 2);
        assert!(creds.iter().all(|c| !c.is_present()));
    }

    #[tokio::test]
    async fn test_each_call_reads_store_again() {
        let mut store = MockSettingsStore::new();
        store
            .expect_get_many()
            .times(2)
            .returning(|_| Ok(stored(&[("OPENROUTER_API_KEY", "or-1")])));
        store.expect_store_name().return_const("mock");

        let resolver = CredentialResolver::new(EnvSnapshot::default(), Some(Arc::new(store)));

        for _ in 0..2 {
            let creds = resolver.resolve(&[ProviderId::OpenRouter]).await;
            assert_eq!(creds[0].api_key(), Some("or-1"));
        }
    }
}
