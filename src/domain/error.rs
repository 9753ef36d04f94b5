use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Missing input: {message}")]
    MissingInput { message: String },

    #[error("Credential error: {message}")]
    Credential { message: String },

    #[error("Provider error: {provider} - HTTP {status}: {body}")]
    ProviderHttp {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    #[error("Provider timeout: {provider} did not answer within {timeout_secs}s")]
    Timeout { provider: String, timeout_secs: u64 },

    #[error("No provider available: {message}")]
    NoProviderAvailable {
        message: String,
        /// Upstream 429/402 reported by one of the attempted providers
        upstream_status: Option<u16>,
    },

    #[error("Malformed provider response: {message}")]
    MalformedProviderResponse { message: String, raw: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn missing_input(message: impl Into<String>) -> Self {
        Self::MissingInput {
            message: message.into(),
        }
    }

    pub fn credential(message: impl Into<String>) -> Self {
        Self::Credential {
            message: message.into(),
        }
    }

    pub fn provider_http(provider: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::ProviderHttp {
            provider: provider.into(),
            status,
            body: body.into(),
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn timeout(provider: impl Into<String>, timeout_secs: u64) -> Self {
        Self::Timeout {
            provider: provider.into(),
            timeout_secs,
        }
    }

    pub fn no_provider_available(message: impl Into<String>, upstream_status: Option<u16>) -> Self {
        Self::NoProviderAvailable {
            message: message.into(),
            upstream_status,
        }
    }

    pub fn malformed_response(message: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::MalformedProviderResponse {
            message: message.into(),
            raw: raw.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// HTTP status reported by the upstream provider, if any
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::ProviderHttp { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether trying the same provider again may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Provider { .. } => true,
            Self::ProviderHttp { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
