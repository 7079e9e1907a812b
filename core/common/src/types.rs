//! Common types used throughout Shelf.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Provider-assigned identifier of a collection.
///
/// Opaque to everything but the provider that issued it. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CollectionId(String);

impl CollectionId {
    /// Create a new CollectionId from a string.
    ///
    /// # Preconditions
    /// - `id` must be non-empty
    ///
    /// # Errors
    /// - Returns error if id is empty
    pub fn new(id: impl Into<String>) -> crate::Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(crate::Error::InvalidInput(
                "CollectionId cannot be empty".to_string(),
            ));
        }
        Ok(Self(id))
    }

    /// Generate a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for CollectionId {
    type Error = crate::Error;

    fn try_from(value: String) -> crate::Result<Self> {
        Self::new(value)
    }
}

impl From<CollectionId> for String {
    fn from(id: CollectionId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_collection_id_creation() {
        let id = CollectionId::new("c1").unwrap();
        assert_eq!(id.as_str(), "c1");
        assert_eq!(id.to_string(), "c1");
    }

    #[test]
    fn test_collection_id_empty_fails() {
        assert!(CollectionId::new("").is_err());
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        assert_ne!(CollectionId::generate(), CollectionId::generate());
    }

    #[test]
    fn test_deserialize_rejects_empty() {
        assert!(serde_json::from_str::<CollectionId>("\"\"").is_err());
        let id: CollectionId = serde_json::from_str("\"c7\"").unwrap();
        assert_eq!(id.as_str(), "c7");
    }

    proptest! {
        #[test]
        fn prop_non_empty_strings_are_accepted(s in ".+") {
            let id = CollectionId::new(s.clone()).unwrap();
            prop_assert_eq!(id.as_str(), s.as_str());
        }
    }
}
