//! Service configuration.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;

use shelf_common::{Error, Result};
use shelf_storage::{CollectionProvider, ProviderRegistry};

/// Default configuration file name.
pub const CONFIG_FILENAME: &str = "shelf.json";

/// Which provider backs the collection service, and how to build it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShelfConfig {
    /// Provider name. When absent, the registry's first provider is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Provider-specific configuration.
    #[serde(default)]
    pub provider_config: Value,
}

impl ShelfConfig {
    /// Configuration for the local provider rooted at `data_dir`.
    pub fn default_for(data_dir: impl AsRef<Path>) -> Self {
        Self {
            provider: Some("local".to_string()),
            provider_config: serde_json::json!({
                "root": data_dir.as_ref().to_string_lossy()
            }),
        }
    }

    /// Build the configured provider from `registry`.
    ///
    /// # Errors
    /// - `Configuration` when the registry is empty
    /// - Provider not found or its configuration is invalid
    pub fn select_provider(
        &self,
        registry: &ProviderRegistry,
    ) -> Result<Arc<dyn CollectionProvider>> {
        registry.select(self.provider.as_deref(), self.provider_config.clone())
    }

    /// Serialize to bytes for storage.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Deserialize from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Read a configuration file.
    ///
    /// # Errors
    /// - `NotFound` when the file does not exist
    /// - Malformed JSON
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                Error::NotFound(format!("Configuration not found: {}", path.display()))
            }
            _ => Error::Io(e),
        })?;
        Self::from_bytes(&bytes)
    }

    /// Write this configuration, creating parent directories as needed.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(path, self.to_bytes()?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_storage::create_default_registry;
    use tempfile::TempDir;

    #[test]
    fn test_default_selects_first_registered() {
        let provider = ShelfConfig::default()
            .select_provider(&create_default_registry())
            .unwrap();
        assert_eq!(provider.name(), "memory");
    }

    #[test]
    fn test_empty_registry_is_a_configuration_error() {
        let result = ShelfConfig::default().select_provider(&ProviderRegistry::new());
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_default_for_uses_local_provider() {
        let temp = TempDir::new().unwrap();
        let config = ShelfConfig::default_for(temp.path());

        let provider = config.select_provider(&create_default_registry()).unwrap();
        assert_eq!(provider.name(), "local");
    }

    #[test]
    fn test_minimal_document() {
        let config = ShelfConfig::from_bytes(br#"{"provider": "memory"}"#).unwrap();
        assert_eq!(config.provider.as_deref(), Some("memory"));
        assert_eq!(config.provider_config, Value::Null);

        let config = ShelfConfig::from_bytes(b"{}").unwrap();
        assert_eq!(config, ShelfConfig::default());
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("conf").join(CONFIG_FILENAME);
        let config = ShelfConfig::default_for(temp.path().join("data"));

        config.save(&path).await.unwrap();
        let loaded = ShelfConfig::load(&path).await.unwrap();

        assert_eq!(loaded, config);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let result = ShelfConfig::load(temp.path().join(CONFIG_FILENAME)).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }
}
