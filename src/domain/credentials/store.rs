use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::Debug;

#[cfg(test)]
use mockall::automock;

use crate::domain::DomainError;

/// Persisted key-value settings table (secondary credential source)
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SettingsStore: Send + Sync + Debug {
    /// Fetch every key in `keys` that has a stored value
    async fn get_many(&self, keys: &[String]) -> Result<HashMap<String, String>, DomainError>;

    /// Backend name for logging
    fn store_name(&self) -> &'static str;
}
