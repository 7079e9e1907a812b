//! Collection service: validation, duplicate checks, provider calls and
//! change notifications.

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::ShelfConfig;
use crate::events::{ChangeNotifier, CollectionEvent};
use crate::outcome::{ChangeOutcome, Failure, Operation};
use crate::view::CollectionView;
use shelf_common::{CollectionId, Result};
use shelf_storage::{CollectionProvider, ProviderRegistry};

/// Internal result of an operation, before it is logged and flattened.
type Attempt<T> = std::result::Result<T, Failure>;

/// Entry point for every collection change.
///
/// Each operation runs the same sequence: validate input, check for a
/// duplicate title where relevant, call the provider, and notify listeners
/// once the provider confirms. Operations never fail: they answer with a
/// [`ChangeOutcome`] or a `bool`, and the cause of any failure goes to the
/// log.
///
/// The duplicate check and the change are separate provider calls, so two
/// concurrent requests for one title can both pass the check. Providers are
/// expected to enforce title uniqueness themselves.
pub struct CollectionService {
    provider: Arc<dyn CollectionProvider>,
    notifier: ChangeNotifier,
}

impl CollectionService {
    /// Create a service backed by `provider`.
    pub fn new(provider: Arc<dyn CollectionProvider>) -> Self {
        Self {
            provider,
            notifier: ChangeNotifier::new(),
        }
    }

    /// Select a provider from `registry` as configured and build the service.
    ///
    /// # Errors
    /// - `Configuration` when the registry is empty
    /// - Provider not found or its configuration is invalid
    pub fn from_config(registry: &ProviderRegistry, config: &ShelfConfig) -> Result<Self> {
        Ok(Self::new(config.select_provider(registry)?))
    }

    /// The provider this service was built with.
    pub fn provider(&self) -> &Arc<dyn CollectionProvider> {
        &self.provider
    }

    /// Notification streams, for registering listeners.
    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    /// Make the collection named by `view` the active one.
    pub async fn activate(&self, view: &CollectionView) -> bool {
        match self.try_activate(view).await {
            Ok(id) => {
                self.notifier.notify(CollectionEvent::ActiveChanged, &id);
                info!("Activate successful. id={}", id);
                true
            }
            Err(failure) => {
                failure.report();
                false
            }
        }
    }

    /// Create a collection titled `title`.
    pub async fn add(&self, title: &str, is_active: bool) -> ChangeOutcome {
        match self.try_add(title, is_active).await {
            Ok(id) => {
                self.notifier.notify(CollectionEvent::Added, &id);
                info!("Add successful. id={}, title={}", id, title);
                ChangeOutcome::Ok
            }
            Err(failure) => {
                failure.report();
                failure.outcome()
            }
        }
    }

    /// Delete the collection named by `view`.
    pub async fn delete(&self, view: &CollectionView) -> bool {
        match self.try_delete(view).await {
            Ok(id) => {
                self.notifier.notify(CollectionEvent::Deleted, &id);
                info!("Delete successful. id={}", id);
                true
            }
            Err(failure) => {
                failure.report();
                false
            }
        }
    }

    /// Rename the collection named by `view` to `new_title`.
    ///
    /// The duplicate check does not exclude the collection itself, so
    /// renaming a collection to its current title yields `Duplicate`.
    pub async fn edit(&self, view: &CollectionView, new_title: &str) -> ChangeOutcome {
        match self.try_edit(view, new_title).await {
            Ok(id) => {
                self.notifier.notify(CollectionEvent::Edited, &id);
                info!("Edit successful. id={}, title={}", id, new_title);
                ChangeOutcome::Ok
            }
            Err(failure) => {
                failure.report();
                failure.outcome()
            }
        }
    }

    /// Every collection, sorted by title.
    ///
    /// A provider error and an empty shelf both come back as an empty list.
    pub async fn list_all(&self) -> Vec<CollectionView> {
        let collections = match self.provider.list_all().await {
            Ok(collections) if !collections.is_empty() => collections,
            Ok(_) => {
                error!("{} returned no collections", Operation::List);
                return Vec::new();
            }
            Err(source) => {
                Failure::Provider {
                    operation: Operation::List,
                    source,
                }
                .report();
                return Vec::new();
            }
        };

        let mut views: Vec<CollectionView> =
            collections.into_iter().map(CollectionView::from).collect();
        views.sort_by(|a, b| a.title.cmp(&b.title));
        views
    }

    async fn try_activate(&self, view: &CollectionView) -> Attempt<CollectionId> {
        let id = require_id(Operation::Activate, view)?;
        let result = self.provider.activate(&id).await;
        confirm(Operation::Activate, result, || format!("id={}", id))?;
        Ok(id)
    }

    async fn try_add(&self, title: &str, is_active: bool) -> Attempt<CollectionId> {
        require_title(Operation::Add, title)?;
        self.ensure_title_free(Operation::Add, title).await?;

        match self.provider.add(title, is_active).await {
            Ok(Some(id)) => Ok(id),
            Ok(None) => Err(Failure::ProviderDeclined {
                operation: Operation::Add,
                detail: format!("No id returned for title={}", title),
            }),
            Err(source) => Err(Failure::Provider {
                operation: Operation::Add,
                source,
            }),
        }
    }

    async fn try_delete(&self, view: &CollectionView) -> Attempt<CollectionId> {
        let id = require_id(Operation::Delete, view)?;
        let result = self.provider.delete(&id).await;
        confirm(Operation::Delete, result, || format!("id={}", id))?;
        Ok(id)
    }

    async fn try_edit(
        &self,
        view: &CollectionView,
        new_title: &str,
    ) -> Attempt<CollectionId> {
        let id = require_id(Operation::Edit, view)?;
        require_title(Operation::Edit, new_title)?;
        self.ensure_title_free(Operation::Edit, new_title).await?;

        let result = self.provider.edit(&id, new_title).await;
        confirm(Operation::Edit, result, || {
            format!("id={}, title={}", id, new_title)
        })?;
        Ok(id)
    }

    /// Fail with `Duplicate` when any collection already holds `title`.
    ///
    /// A failed lookup is logged as a warning and treated as "no such
    /// title"; the provider gets the final say when the change is applied.
    /// Only the outcome of the operation itself is logged as an error.
    async fn ensure_title_free(
        &self,
        operation: Operation,
        title: &str,
    ) -> Attempt<()> {
        match self.provider.find_id_by_title(title).await {
            Ok(Some(_)) => Err(Failure::Duplicate {
                operation,
                title: title.to_string(),
            }),
            Ok(None) => Ok(()),
            Err(err) => {
                warn!("{} duplicate check skipped. {}", operation, err);
                Ok(())
            }
        }
    }
}

fn require_id(operation: Operation, view: &CollectionView) -> Attempt<CollectionId> {
    CollectionId::new(view.id.as_str()).map_err(|_| Failure::Validation {
        operation,
        reason: "id is empty",
    })
}

fn require_title(operation: Operation, title: &str) -> Attempt<()> {
    if title.trim().is_empty() {
        return Err(Failure::Validation {
            operation,
            reason: "title is empty",
        });
    }
    Ok(())
}

/// Turn a provider's yes/no answer into a failure on "no" or error.
fn confirm(
    operation: Operation,
    result: Result<bool>,
    detail: impl FnOnce() -> String,
) -> Attempt<()> {
    match result {
        Ok(true) => Ok(()),
        Ok(false) => Err(Failure::ProviderDeclined {
            operation,
            detail: detail(),
        }),
        Err(source) => Err(Failure::Provider { operation, source }),
    }
}
