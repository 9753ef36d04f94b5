use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use super::config::FallbackPolicy;
use crate::domain::{
    CompletionExtras, DomainError, FallbackOutcome, FallbackState, PromptPair, ProviderAdapter,
    ProviderAttemptResult, ProviderCredentials, ProviderId,
};
use crate::infrastructure::llm::ProviderRegistry;
use crate::infrastructure::observability::{record_provider_attempt, AttemptOutcome};

/// Walks the provider priority list until one adapter returns a non-empty completion.
///
/// Providers are tried one at a time. Failures are logged and recorded as attempts; they only
/// reach the caller in aggregate, through [`FallbackOutcome::into_result`].
#[derive(Debug, Clone)]
pub struct FallbackOrchestrator {
    registry: ProviderRegistry,
    policy: FallbackPolicy,
}

impl FallbackOrchestrator {
    pub fn new(registry: ProviderRegistry, policy: FallbackPolicy) -> Self {
        Self { registry, policy }
    }

    /// `credentials` carries the priority order
    pub async fn run(
        &self,
        prompt: &PromptPair,
        credentials: &[ProviderCredentials],
        extras: &CompletionExtras,
    ) -> FallbackOutcome {
        let mut state = FallbackState::NotAttempted;
        let mut attempts = Vec::new();

        for creds in credentials {
            let provider = creds.provider_id();

            if !creds.is_present() {
                debug!(provider = %provider, "Skipping provider without API key");
                continue;
            }

            let Some(adapter) = self.registry.get(provider) else {
                warn!(provider = %provider, "No adapter registered for provider");
                continue;
            };

            state = FallbackState::Trying(provider);
            debug!(state = ?state, "Fallback chain advancing");

            if let Some(text) = self
                .try_provider(adapter, creds, prompt, extras, &mut attempts)
                .await
            {
                state = FallbackState::Succeeded(provider);
                info!(
                    provider = %provider,
                    attempts = attempts.len(),
                    "AI provider answered"
                );

                return FallbackOutcome {
                    state,
                    raw_text: Some(text),
                    attempts,
                };
            }
        }

        if matches!(state, FallbackState::NotAttempted) {
            warn!("No AI provider has an API key configured");
        } else {
            warn!(attempts = attempts.len(), "All AI providers failed");
        }

        FallbackOutcome {
            state: FallbackState::AllFailed,
            raw_text: None,
            attempts,
        }
    }

    /// Up to `max_attempts` calls against one provider; retries only retryable errors
    async fn try_provider(
        &self,
        adapter: Arc<dyn ProviderAdapter>,
        creds: &ProviderCredentials,
        prompt: &PromptPair,
        extras: &CompletionExtras,
        attempts: &mut Vec<ProviderAttemptResult>,
    ) -> Option<String> {
        let provider = adapter.id();
        let max_attempts = self.policy.max_attempts();

        for attempt in 1..=max_attempts {
            let started = Instant::now();
            let result = self.call_with_timeout(adapter.as_ref(), creds, prompt, extras).await;
            let elapsed = started.elapsed();

            match result {
                Ok(text) if !text.trim().is_empty() => {
                    record_provider_attempt(provider.as_str(), AttemptOutcome::Success, elapsed);
                    attempts.push(ProviderAttemptResult::success(provider, text.clone(), elapsed));
                    return Some(text);
                }
                Ok(_) => {
                    warn!(provider = %provider, attempt, "AI provider returned an empty completion");
                    record_provider_attempt(provider.as_str(), AttemptOutcome::Empty, elapsed);
                    attempts.push(ProviderAttemptResult::empty(provider, elapsed));
                    return None;
                }
                Err(e) => {
                    warn!(provider = %provider, attempt, error = %e, "AI provider call failed");

                    let outcome = match &e {
                        DomainError::Timeout { .. } => AttemptOutcome::Timeout,
                        _ => AttemptOutcome::Error,
                    };
                    record_provider_attempt(provider.as_str(), outcome, elapsed);
                    attempts.push(ProviderAttemptResult::failure(provider, &e, elapsed));

                    if !e.is_retryable() || attempt == max_attempts {
                        return None;
                    }

                    let backoff = self.policy.backoff_for_attempt(attempt - 1);
                    debug!(provider = %provider, backoff_ms = backoff.as_millis() as u64, "Retrying provider");
                    tokio::time::sleep(backoff).await;
                }
            }
        }

        None
    }

    async fn call_with_timeout(
        &self,
        adapter: &dyn ProviderAdapter,
        creds: &ProviderCredentials,
        prompt: &PromptPair,
        extras: &CompletionExtras,
    ) -> Result<String, DomainError> {
        let timeout = self.policy.provider_timeout();

        match tokio::time::timeout(timeout, adapter.complete(prompt, creds, extras)).await {
            Ok(result) => result,
            Err(_) => Err(DomainError::timeout(
                adapter.id().as_str(),
                self.policy.provider_timeout_secs,
            )),
        }
    }

    /// Providers in `order` that have an adapter registered
    pub fn routable(&self, order: &[ProviderId]) -> Vec<ProviderId> {
        order
            .iter()
            .copied()
            .filter(|provider| self.registry.contains(*provider))
            .collect()
    }
}
