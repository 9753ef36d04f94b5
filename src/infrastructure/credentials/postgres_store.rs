//! PostgreSQL settings store

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::time::Duration;

use crate::domain::{DomainError, SettingsStore};

/// Reads provider keys from the `app_settings(key, value)` table.
/// The table is owned and written elsewhere; this store never mutates it.
#[derive(Debug, Clone)]
pub struct PostgresSettingsStore {
    pool: PgPool,
    table: String,
}

impl PostgresSettingsStore {
    pub fn new(pool: PgPool, table: impl Into<String>) -> Self {
        Self {
            pool,
            table: table.into(),
        }
    }

    /// Build a lazily connected pool; nothing touches the network until the first lookup
    pub fn connect_lazy(
        database_url: &str,
        table: impl Into<String>,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, DomainError> {
        let table = table.into();
        validate_table_name(&table)?;

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect_lazy(database_url)
            .map_err(|e| DomainError::configuration(format!("Invalid database URL: {}", e)))?;

        Ok(Self::new(pool, table))
    }
}

#[async_trait]
impl SettingsStore for PostgresSettingsStore {
    async fn get_many(&self, keys: &[String]) -> Result<HashMap<String, String>, DomainError> {
        if keys.is_empty() {
            return Ok(HashMap::new());
        }

        let query = format!(
            "SELECT key, value FROM {} WHERE key = ANY($1)",
            self.table
        );

        let rows = sqlx::query(&query)
            .bind(keys)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to read settings: {}", e)))?;

        let mut values = HashMap::with_capacity(rows.len());
        for row in rows {
            let key: String = row
                .try_get("key")
                .map_err(|e| DomainError::storage(format!("Invalid settings row: {}", e)))?;
            let value: Option<String> = row
                .try_get("value")
                .map_err(|e| DomainError::storage(format!("Invalid settings row: {}", e)))?;

            if let Some(value) = value {
                values.insert(key, value);
            }
        }

        Ok(values)
    }

    fn store_name(&self) -> &'static str {
        "postgres"
    }
}

/// The table name is interpolated into SQL, so only plain identifiers are accepted
fn validate_table_name(table: &str) -> Result<(), DomainError> {
    let valid = !table.is_empty()
        && table
            .split('.')
            .all(|part| {
                !part.is_empty()
                    && part
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '_')
            });

    if valid {
        Ok(())
    } else {
        Err(DomainError::configuration(format!(
            "Invalid settings table name: {}",
            table
        )))
    }
}
