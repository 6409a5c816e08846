//! Config Store: connection settings that outlive a session
//!
//! `SqliteConfigStore` keeps values in the settings database and seals the
//! API token before it is written. `MemoryConfigStore` lives only as long as
//! the process.

use crate::encryption::SecretCipher;
use crate::sqlite::{self, Database};
use async_trait::async_trait;
use portfoliox_core::{ApiConfig, Result, DEFAULT_BASE_URL, KEY_API_BASE_URL, KEY_API_TOKEN};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Key-value storage for connection settings
#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove every stored key
    async fn clear(&self) -> Result<()>;
}

/// Build the gateway config from stored keys, falling back to the default base URL
pub async fn load_api_config<S: ConfigStore + ?Sized>(store: &S) -> Result<ApiConfig> {
    let base_url = store
        .get(KEY_API_BASE_URL)
        .await?
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let token = store.get(KEY_API_TOKEN).await?;
    Ok(ApiConfig::new(base_url, token))
}

/// Persist both keys; a missing token is stored as empty
pub async fn save_api_config<S: ConfigStore + ?Sized>(store: &S, config: &ApiConfig) -> Result<()> {
    store.set(KEY_API_BASE_URL, &config.base_url).await?;
    store
        .set(KEY_API_TOKEN, config.token.as_deref().unwrap_or(""))
        .await
}

pub struct SqliteConfigStore {
    db: Database,
    cipher: SecretCipher,
}

impl SqliteConfigStore {
    pub fn new(db: Database, cipher: SecretCipher) -> Self {
        Self { db, cipher }
    }

    fn is_secret(key: &str) -> bool {
        key == KEY_API_TOKEN
    }
}

#[async_trait]
impl ConfigStore for SqliteConfigStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        if Self::is_secret(key) {
            match sqlite::get_secret(self.db.pool(), key).await? {
                Some(sealed) => self.cipher.open(&sealed).map(Some),
                None => Ok(None),
            }
        } else {
            sqlite::get_setting(self.db.pool(), key).await
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        if Self::is_secret(key) {
            let sealed = self.cipher.seal(value)?;
            sqlite::put_secret(self.db.pool(), key, &sealed).await?;
        } else {
            sqlite::put_setting(self.db.pool(), key, value).await?;
        }
        debug!("Stored setting {}", key);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let removed = sqlite::clear_all(self.db.pool()).await?;
        info!("Cleared {} stored settings", removed);
        Ok(())
    }
}

/// Session-only store
#[derive(Default)]
pub struct MemoryConfigStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConfigStore for MemoryConfigStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.values.write().await.clear();
        Ok(())
    }
}
