use serde::Serialize;
use tracing::debug;

use super::normalizer;
use super::orchestrator::FallbackOrchestrator;
use crate::domain::chemistry::ResponseSchema;
use crate::domain::{CompletionExtras, DomainError, PromptPair, ProviderId};
use crate::infrastructure::credentials::CredentialResolver;

/// Completion produced by the fallback chain, tagged with the provider that answered
#[derive(Debug, Clone)]
pub struct GatewayReply<T> {
    pub provider: ProviderId,
    pub payload: T,
}

/// Credential availability for one provider in the priority list
#[derive(Debug, Clone, Serialize)]
pub struct ProviderStatus {
    pub provider: ProviderId,
    pub priority: usize,
    pub has_key: bool,
}

/// Entry point used by the HTTP handlers: resolve keys, run the chain, normalize the answer
#[derive(Debug, Clone)]
pub struct AiGateway {
    resolver: CredentialResolver,
    orchestrator: FallbackOrchestrator,
    provider_order: Vec<ProviderId>,
}

impl AiGateway {
    pub fn new(
        resolver: CredentialResolver,
        orchestrator: FallbackOrchestrator,
        provider_order: Vec<ProviderId>,
    ) -> Self {
        let provider_order = orchestrator.routable(&provider_order);
        Self {
            resolver,
            orchestrator,
            provider_order,
        }
    }

    pub fn provider_order(&self) -> &[ProviderId] {
        &self.provider_order
    }

    /// Run the chain and parse the completion into `T`
    pub async fn complete_json<T: ResponseSchema>(
        &self,
        prompt: &PromptPair,
        extras: &CompletionExtras,
    ) -> Result<GatewayReply<T>, DomainError> {
        let (provider, raw) = self.complete_raw(prompt, extras).await?;

        let payload = normalizer::parse::<T>(&raw).inspect_err(|e| {
            tracing::warn!(provider = %provider, schema = T::NAME, error = %e, "Discarding malformed completion");
        })?;

        Ok(GatewayReply { provider, payload })
    }

    /// Run the chain and return the completion text as-is (trimmed)
    pub async fn complete_text(
        &self,
        prompt: &PromptPair,
        extras: &CompletionExtras,
    ) -> Result<GatewayReply<String>, DomainError> {
        let (provider, raw) = self.complete_raw(prompt, extras).await?;

        Ok(GatewayReply {
            provider,
            payload: raw.trim().to_string(),
        })
    }

    /// Which providers currently resolve to a key, in priority order
    pub async fn provider_status(&self) -> Vec<ProviderStatus> {
        self.resolver
            .resolve(&self.provider_order)
            .await
            .into_iter()
            .enumerate()
            .map(|(i, creds)| ProviderStatus {
                provider: creds.provider_id(),
                priority: i + 1,
                has_key: creds.is_present(),
            })
            .collect()
    }

    async fn complete_raw(
        &self,
        prompt: &PromptPair,
        extras: &CompletionExtras,
    ) -> Result<(ProviderId, String), DomainError> {
        let credentials = self.resolver.resolve(&self.provider_order).await;
        debug!(
            available = credentials.iter().filter(|c| c.is_present()).count(),
            configured = credentials.len(),
            "Resolved provider credentials"
        );

        self.orchestrator
            .run(prompt, &credentials, extras)
            .await
            .into_result()
    }
}
