//! Provider registry for picking the collection backend at startup.

use std::sync::Arc;
use serde_json::Value;
use tracing::info;

use shelf_common::{Error, Result};
use crate::provider::CollectionProvider;

/// Factory function type for creating providers.
pub type ProviderFactory = Box<dyn Fn(Value) -> Result<Arc<dyn CollectionProvider>> + Send + Sync>;

/// Registry for collection provider factories.
///
/// Candidates keep their registration order; that order is what
/// [`ProviderRegistry::select`] falls back on when no name is given.
pub struct ProviderRegistry {
    factories: Vec<(String, ProviderFactory)>,
}

impl ProviderRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            factories: Vec::new(),
        }
    }

    /// Register a provider factory.
    ///
    /// # Preconditions
    /// - `name` must be unique within the registry
    ///
    /// # Errors
    /// - Returns error if name is already registered
    pub fn register(
        &mut self,
        name: impl Into<String>,
        factory: ProviderFactory,
    ) -> Result<()> {
        let name = name.into();
        if self.has_provider(&name) {
            return Err(Error::AlreadyExists(format!(
                "Provider '{}' is already registered",
                name
            )));
        }
        self.factories.push((name, factory));
        Ok(())
    }

    /// Resolve a provider by name and configuration.
    ///
    /// # Errors
    /// - Provider not found
    /// - Configuration invalid
    pub fn resolve(&self, name: &str, config: Value) -> Result<Arc<dyn CollectionProvider>> {
        let (_, factory) = self
            .factories
            .iter()
            .find(|(registered, _)| registered == name)
            .ok_or_else(|| Error::NotFound(format!("Provider '{}' is not registered", name)))?;
        factory(config)
    }

    /// Select the provider the collection service will use.
    ///
    /// With `preferred` set, that provider is resolved. Otherwise the first
    /// registered provider wins.
    ///
    /// # Errors
    /// - `Configuration` when nothing is registered
    /// - Anything [`ProviderRegistry::resolve`] returns
    pub fn select(
        &self,
        preferred: Option<&str>,
        config: Value,
    ) -> Result<Arc<dyn CollectionProvider>> {
        let name = match preferred {
            Some(name) => name,
            None => self
                .factories
                .first()
                .map(|(name, _)| name.as_str())
                .ok_or_else(|| {
                    Error::Configuration("no collection provider registered".to_string())
                })?,
        };

        let provider = self.resolve(name, config)?;
        info!("Selected collection provider '{}'", provider.name());
        Ok(provider)
    }

    /// Get registered provider names, in registration order.
    pub fn providers(&self) -> Vec<String> {
        self.factories.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Check if a provider is registered.
    pub fn has_provider(&self, name: &str) -> bool {
        self.factories.iter().any(|(registered, _)| registered == name)
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a registry with the bundled providers: `memory`, then `local`.
pub fn create_default_registry() -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();

    // Register memory provider (for testing)
    registry
        .register("memory", Box::new(|_config| {
            Ok(Arc::new(crate::memory::MemoryProvider::new()))
        }))
        .expect("Failed to register memory provider");

    // Register local filesystem provider
    registry
        .register("local", Box::new(|config| {
            let root = config
                .get("root")
                .and_then(|v| v.as_str())
                .ok_or_else(|| Error::InvalidInput("Local provider requires 'root' path".to_string()))?;
            Ok(Arc::new(crate::local::LocalProvider::new(root)?))
        }))
        .expect("Failed to register local provider");

    registry
}
