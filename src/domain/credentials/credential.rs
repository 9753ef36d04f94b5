use crate::domain::llm::ProviderId;

/// Names under which a provider's API key may be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialKey {
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
}

impl CredentialKey {
    pub fn for_provider(provider: ProviderId) -> Self {
        match provider {
            ProviderId::GoogleAi => Self {
                canonical: "GOOGLE_AI_API_KEY",
                aliases: &["GEMINI_API_KEY", "GOOGLE_API_KEY"],
            },
            ProviderId::Groq => Self {
                canonical: "GROQ_API_KEY",
                aliases: &[],
            },
            ProviderId::OpenRouter => Self {
                canonical: "OPENROUTER_API_KEY",
                aliases: &[],
            },
            ProviderId::OpenAi => Self {
                canonical: "OPENAI_API_KEY",
                aliases: &[],
            },
        }
    }

    /// Canonical name first, then aliases
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        std::iter::once(self.canonical).chain(self.aliases.iter().copied())
    }
}

/// API key resolved for one provider within one request
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderCredentials {
    provider_id: ProviderId,
    api_key: Option<String>,
}

impl ProviderCredentials {
    pub fn new(provider_id: ProviderId, api_key: Option<String>) -> Self {
        let api_key = api_key.filter(|k| !k.trim().is_empty());
        Self {
            provider_id,
            api_key,
        }
    }

    pub fn missing(provider_id: ProviderId) -> Self {
        Self::new(provider_id, None)
    }

    pub fn provider_id(&self) -> ProviderId {
        self.provider_id
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn is_present(&self) -> bool {
        self.api_key.is_some()
    }
}

impl std::fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("provider_id", &self.provider_id)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_google_key_names_include_aliases() {
        let names: Vec<_> = CredentialKey::for_provider(ProviderId::GoogleAi).names().collect();
        assert_eq!(names, vec!["GOOGLE_AI_API_KEY", "GEMINI_API_KEY", "GOOGLE_API_KEY"]);
    }

    #[test]
    fn test_blank_key_is_absent() {
        let creds = ProviderCredentials::new(ProviderId::Groq, Some("   ".to_string()));
        assert!(!creds.is_present());
        assert_eq!(creds.api_key(), None);
    }

    #[test]
    fn test_debug_redacts_key() {
        let creds = ProviderCredentials::new(ProviderId::Groq, Some("gsk-secret".to_string()));
        let debug = format!("{creds:?}");
        assert!(!debug.contains("gsk-secret"));
        assert!(debug.contains("REDACTED"));
    }
}
