use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::{InMemorySettingsStore, PostgresSettingsStore};
use crate::domain::{DomainError, SettingsStore};

/// Secondary credential source behind the environment
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SettingsBackend {
    #[default]
    None,
    Memory,
    Postgres,
}

/// Settings store configuration (`[settings]`)
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsConfig {
    #[serde(default)]
    pub backend: SettingsBackend,
    /// Falls back to `DATABASE_URL` from the environment when unset
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
    /// Seed values for the `memory` backend
    #[serde(default)]
    pub values: HashMap<String, String>,
}

fn default_table() -> String {
    "app_settings".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            backend: SettingsBackend::default(),
            database_url: None,
            table: default_table(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
            values: HashMap::new(),
        }
    }
}

/// Factory for creating settings stores
#[derive(Debug)]
pub struct SettingsStoreFactory;

impl SettingsStoreFactory {
    /// `database_url_fallback` is consulted for the postgres backend when the config has none
    pub fn create(
        config: &SettingsConfig,
        database_url_fallback: Option<&str>,
    ) -> Result<Option<Arc<dyn SettingsStore>>, DomainError> {
        match config.backend {
            SettingsBackend::None => Ok(None),

            SettingsBackend::Memory => {
                // config keys arrive lowercased; setting names are upper snake case
                let values = config
                    .values
                    .iter()
                    .map(|(key, value)| (key.to_ascii_uppercase(), value.clone()))
                    .collect();

                Ok(Some(Arc::new(InMemorySettingsStore::with_values(values))))
            }

            SettingsBackend::Postgres => {
                let database_url = config
                    .database_url
                    .as_deref()
                    .or(database_url_fallback)
                    .ok_or_else(|| {
                        DomainError::configuration(
                            "settings.backend = postgres requires settings.database_url or DATABASE_URL",
                        )
                    })?;

                let store = PostgresSettingsStore::connect_lazy(
                    database_url,
                    &config.table,
                    config.max_connections,
                    Duration::from_secs(config.acquire_timeout_secs),
                )?;

                Ok(Some(Arc::new(store)))
            }
        }
    }
}
