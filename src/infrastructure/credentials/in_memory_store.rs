use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::{DomainError, SettingsStore};

/// Settings store backed by a map, seeded from configuration or tests
#[derive(Debug, Default)]
pub struct InMemorySettingsStore {
    values: RwLock<HashMap<String, String>>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values(values: HashMap<String, String>) -> Self {
        Self {
            values: RwLock::new(values),
        }
    }

    pub fn with_value(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let Ok(mut values) = self.values.write() {
            values.insert(key.into(), value.into());
        }
        self
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) -> Result<(), DomainError> {
        let mut values = self
            .values
            .write()
            .map_err(|e| DomainError::internal(format!("Lock error: {}", e)))?;
        values.insert(key.into(), value.into());
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn get_many(&self, keys: &[String]) -> Result<HashMap<String, String>, DomainError> {
        let values = self
            .values
            .read()
            .map_err(|e| DomainError::internal(format!("Lock error: {}", e)))?;

        Ok(keys
            .iter()
            .filter_map(|key| values.get(key).map(|value| (key.clone(), value.clone())))
            .collect())
    }

    fn store_name(&self) -> &'static str {
        "memory"
    }
}
