//! Collection bookkeeping shared by the bundled providers.

use serde::{Deserialize, Serialize};

use crate::provider::Collection;
use shelf_common::{CollectionId, Error, Result};

/// Every collection a provider holds, with the shelf rules applied on write:
/// titles are unique and at most one collection is active.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct CollectionSet {
    collections: Vec<Collection>,
}

impl CollectionSet {
    pub(crate) fn find_id_by_title(&self, title: &str) -> Option<CollectionId> {
        self.collections
            .iter()
            .find(|c| c.title == title)
            .map(|c| c.id.clone())
    }

    pub(crate) fn add(&mut self, title: &str, is_active: bool) -> Result<CollectionId> {
        self.ensure_title_free(title, None)?;

        if is_active {
            self.clear_active();
        }

        let collection = Collection::new(title, is_active);
        let id = collection.id.clone();
        self.collections.push(collection);
        Ok(id)
    }

    pub(crate) fn delete(&mut self, id: &CollectionId) -> bool {
        let before = self.collections.len();
        self.collections.retain(|c| &c.id != id);
        self.collections.len() < before
    }

    pub(crate) fn edit(&mut self, id: &CollectionId, new_title: &str) -> Result<bool> {
        if !self.contains(id) {
            return Ok(false);
        }
        self.ensure_title_free(new_title, Some(id))?;

        if let Some(collection) = self.collections.iter_mut().find(|c| &c.id == id) {
            collection.title = new_title.to_string();
        }
        Ok(true)
    }

    pub(crate) fn activate(&mut self, id: &CollectionId) -> bool {
        if !self.contains(id) {
            return false;
        }
        for collection in &mut self.collections {
            collection.is_active = &collection.id == id;
        }
        true
    }

    pub(crate) fn all(&self) -> Vec<Collection> {
        self.collections.clone()
    }

    fn contains(&self, id: &CollectionId) -> bool {
        self.collections.iter().any(|c| &c.id == id)
    }

    fn clear_active(&mut self) {
        for collection in &mut self.collections {
            collection.is_active = false;
        }
    }

    fn ensure_title_free(&self, title: &str, owner: Option<&CollectionId>) -> Result<()> {
        match self.collections.iter().find(|c| c.title == title) {
            Some(existing) if Some(&existing.id) != owner => Err(Error::AlreadyExists(format!(
                "Collection titled '{}' already exists",
                title
            ))),
            _ => Ok(()),
        }
    }
}
