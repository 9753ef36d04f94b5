//! Credential management domain

mod credential;
mod env;
mod store;

pub use credential::{CredentialKey, ProviderCredentials};
pub use env::EnvSnapshot;
pub use store::SettingsStore;

#[cfg(test)]
pub use store::MockSettingsStore;
