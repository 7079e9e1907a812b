//! In-memory collection provider for testing.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::provider::{Collection, CollectionProvider};
use crate::set::CollectionSet;
use shelf_common::{CollectionId, Result};

/// In-memory collection provider.
///
/// Useful for testing and development. All data is stored in memory
/// and lost on drop.
#[derive(Default)]
pub struct MemoryProvider {
    collections: RwLock<CollectionSet>,
}

impl MemoryProvider {
    /// Create a new empty memory provider.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CollectionProvider for MemoryProvider {
    fn name(&self) -> &str {
        "memory"
    }

    async fn find_id_by_title(&self, title: &str) -> Result<Option<CollectionId>> {
        Ok(self.collections.read().await.find_id_by_title(title))
    }

    async fn add(&self, title: &str, is_active: bool) -> Result<Option<CollectionId>> {
        let id = self.collections.write().await.add(title, is_active)?;
        Ok(Some(id))
    }

    async fn delete(&self, id: &CollectionId) -> Result<bool> {
        Ok(self.collections.write().await.delete(id))
    }

    async fn edit(&self, id: &CollectionId, new_title: &str) -> Result<bool> {
        self.collections.write().await.edit(id, new_title)
    }

    async fn activate(&self, id: &CollectionId) -> Result<bool> {
        Ok(self.collections.write().await.activate(id))
    }

    async fn list_all(&self) -> Result<Vec<Collection>> {
        Ok(self.collections.read().await.all())
    }
}
