//! Credential resolution and settings store implementations

mod factory;
mod in_memory_store;
mod postgres_store;
mod resolver;

pub use factory::{SettingsBackend, SettingsConfig, SettingsStoreFactory};
pub use in_memory_store::InMemorySettingsStore;
pub use postgres_store::PostgresSettingsStore;
pub use resolver::CredentialResolver;
