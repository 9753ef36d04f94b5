use std::time::Duration;

use super::ProviderId;
use crate::domain::DomainError;

/// Outcome of a single adapter invocation within one request
#[derive(Debug, Clone)]
pub struct ProviderAttemptResult {
    pub provider_id: ProviderId,
    pub succeeded: bool,
    pub raw_text: Option<String>,
    pub error: Option<String>,
    /// Upstream HTTP status when the provider answered with a non-2xx response
    pub status: Option<u16>,
    pub elapsed: Duration,
}

impl ProviderAttemptResult {
    pub fn success(provider_id: ProviderId, raw_text: String, elapsed: Duration) -> Self {
        Self {
            provider_id,
            succeeded: true,
            raw_text: Some(raw_text),
            error: None,
            status: None,
            elapsed,
        }
    }

    pub fn failure(provider_id: ProviderId, error: &DomainError, elapsed: Duration) -> Self {
        Self {
            provider_id,
            succeeded: false,
            raw_text: None,
            error: Some(error.to_string()),
            status: error.upstream_status(),
            elapsed,
        }
    }

    pub fn empty(provider_id: ProviderId, elapsed: Duration) -> Self {
        Self {
            provider_id,
            succeeded: false,
            raw_text: None,
            error: Some("Provider returned an empty completion".to_string()),
            status: None,
            elapsed,
        }
    }
}

/// Progress of the fallback chain for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackState {
    NotAttempted,
    Trying(ProviderId),
    Succeeded(ProviderId),
    AllFailed,
}

impl FallbackState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, FallbackState::Succeeded(_) | FallbackState::AllFailed)
    }
}

/// Final state of the chain plus every attempt made on the way
#[derive(Debug, Clone)]
pub struct FallbackOutcome {
    pub state: FallbackState,
    pub raw_text: Option<String>,
    pub attempts: Vec<ProviderAttemptResult>,
}

impl FallbackOutcome {
    /// Status to pass through to the caller when every provider failed.
    /// Rate limiting wins over billing errors.
    pub fn pass_through_status(&self) -> Option<u16> {
        let reported = |code: u16| self.attempts.iter().any(|a| a.status == Some(code));

        if reported(429) {
            Some(429)
        } else if reported(402) {
            Some(402)
        } else {
            None
        }
    }

    /// Turn the terminal state into the completion text or a caller-visible error
    pub fn into_result(self) -> Result<(ProviderId, String), DomainError> {
        let status = self.pass_through_status();
        let attempted = self.attempts.len();

        if let (FallbackState::Succeeded(provider), Some(text)) = (self.state, self.raw_text) {
            return Ok((provider, text));
        }

        let message = if attempted == 0 {
            "No AI provider is configured".to_string()
        } else {
            format!("All {} AI provider attempts failed", attempted)
        };

        Err(DomainError::no_provider_available(message, status))
    }
}
