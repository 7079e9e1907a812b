//! Caller-facing projection of a collection.

use serde::{Deserialize, Serialize};

use shelf_storage::Collection;

/// Read-only view of a collection, as handed to and from the UI layer.
///
/// `id` is kept as a plain string: views may come from callers that never
/// saw a provider, and the service validates it on the way in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionView {
    pub id: String,
    pub title: String,
    pub is_active: bool,
}

impl CollectionView {
    pub fn new(id: impl Into<String>, title: impl Into<String>, is_active: bool) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            is_active,
        }
    }

    /// A view that only names a collection, for operations keyed by id.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self::new(id, String::new(), false)
    }
}

impl From<Collection> for CollectionView {
    fn from(collection: Collection) -> Self {
        Self {
            id: collection.id.into(),
            title: collection.title,
            is_active: collection.is_active,
        }
    }
}
