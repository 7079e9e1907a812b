//! Local filesystem collection provider.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use crate::provider::{Collection, CollectionProvider};
use crate::set::CollectionSet;
use shelf_common::{CollectionId, Result};

/// Name of the document holding every collection.
pub const COLLECTIONS_FILENAME: &str = "collections.json";

/// Local filesystem collection provider.
///
/// Keeps the whole shelf in one JSON document under a root directory.
/// Every write replaces the document through a temporary file and a rename.
pub struct LocalProvider {
    root: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl LocalProvider {
    /// Create a new local provider with the given root directory.
    ///
    /// # Postconditions
    /// - Root directory is created if it doesn't exist
    ///
    /// # Errors
    /// - Permission denied
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        // Create root if it doesn't exist (sync for constructor)
        if !root.exists() {
            std::fs::create_dir_all(&root)?;
        }

        Ok(Self {
            root,
            lock: Mutex::new(()),
        })
    }

    /// Root directory of this provider.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn document_path(&self) -> PathBuf {
        self.root.join(COLLECTIONS_FILENAME)
    }

    async fn load(&self) -> Result<CollectionSet> {
        let path = self.document_path();
        if !fs::try_exists(&path).await? {
            return Ok(CollectionSet::default());
        }
        let bytes = fs::read(&path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn store(&self, set: &CollectionSet) -> Result<()> {
        let path = self.document_path();
        let tmp = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(set)?;

        fs::write(&tmp, &bytes).await?;
        fs::rename(&tmp, &path).await?;
        debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }

    /// Load the document, apply `change`, and write it back when asked to.
    async fn update<T: Send>(
        &self,
        change: impl FnOnce(&mut CollectionSet) -> Result<(T, bool)> + Send,
    ) -> Result<T> {
        let _guard = self.lock.lock().await;
        let mut set = self.load().await?;
        let (value, dirty) = change(&mut set)?;
        if dirty {
            self.store(&set).await?;
        }
        Ok(value)
    }
}

#[async_trait]
impl CollectionProvider for LocalProvider {
    fn name(&self) -> &str {
        "local"
    }

    async fn find_id_by_title(&self, title: &str) -> Result<Option<CollectionId>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.find_id_by_title(title))
    }

    async fn add(&self, title: &str, is_active: bool) -> Result<Option<CollectionId>> {
        self.update(|set| Ok((Some(set.add(title, is_active)?), true)))
            .await
    }

    async fn delete(&self, id: &CollectionId) -> Result<bool> {
        self.update(|set| {
            let removed = set.delete(id);
            Ok((removed, removed))
        })
        .await
    }

    async fn edit(&self, id: &CollectionId, new_title: &str) -> Result<bool> {
        self.update(|set| {
            let renamed = set.edit(id, new_title)?;
            Ok((renamed, renamed))
        })
        .await
    }

    async fn activate(&self, id: &CollectionId) -> Result<bool> {
        self.update(|set| {
            let activated = set.activate(id);
            Ok((activated, activated))
        })
        .await
    }

    async fn list_all(&self) -> Result<Vec<Collection>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.all())
    }
}
