//! Collection provider trait definition.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shelf_common::{CollectionId, Result};

/// A collection as stored by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// Provider-assigned identifier.
    pub id: CollectionId,
    /// User-visible title, unique across the shelf.
    pub title: String,
    /// Whether this is the active collection.
    pub is_active: bool,
    /// Creation time.
    pub created: DateTime<Utc>,
}

impl Collection {
    /// Create a collection record with a fresh id.
    pub fn new(title: impl Into<String>, is_active: bool) -> Self {
        Self {
            id: CollectionId::generate(),
            title: title.into(),
            is_active,
            created: Utc::now(),
        }
    }
}

/// Storage provider trait for collection backends.
///
/// A negative answer (`Ok(None)`, `Ok(false)`) means the provider declined
/// the request; `Err` means it could not carry it out. Callers decide how to
/// treat each.
#[async_trait]
pub trait CollectionProvider: Send + Sync {
    /// Get the provider name (e.g., "memory", "local").
    fn name(&self) -> &str;

    /// Look up the id of the collection holding `title`.
    ///
    /// Titles are compared exactly.
    async fn find_id_by_title(&self, title: &str) -> Result<Option<CollectionId>>;

    /// Create a collection.
    ///
    /// # Postconditions
    /// - When `is_active` is set, every other collection is inactive
    ///
    /// # Errors
    /// - Title already taken
    /// - Storage failure
    async fn add(&self, title: &str, is_active: bool) -> Result<Option<CollectionId>>;

    /// Delete a collection. Returns `false` for unknown ids.
    async fn delete(&self, id: &CollectionId) -> Result<bool>;

    /// Rename a collection. Returns `false` for unknown ids.
    ///
    /// # Errors
    /// - Title already taken by another collection
    async fn edit(&self, id: &CollectionId, new_title: &str) -> Result<bool>;

    /// Make `id` the only active collection. Returns `false` for unknown ids.
    async fn activate(&self, id: &CollectionId) -> Result<bool>;

    /// List every collection, in no particular order.
    async fn list_all(&self) -> Result<Vec<Collection>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_serialization() {
        let collection = Collection::new("Notes", true);

        let json = serde_json::to_string(&collection).unwrap();
        let deserialized: Collection = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized, collection);
    }

    #[test]
    fn test_new_collection_gets_unique_id() {
        let a = Collection::new("a", false);
        let b = Collection::new("a", false);
        assert_ne!(a.id, b.id);
    }
}
