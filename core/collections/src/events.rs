//! Change notifications raised by the collection service.
//!
//! Four streams, one per kind of change, each a [`Listeners`] list.
//! Delivery is synchronous: listeners run in registration order on the
//! caller's task before the triggering operation returns. Nothing is
//! buffered and late subscribers see only later changes.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

use shelf_common::CollectionId;

/// Kind of change a notification reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionEvent {
    Added,
    Edited,
    Deleted,
    ActiveChanged,
}

impl CollectionEvent {
    pub const ALL: [CollectionEvent; 4] = [
        CollectionEvent::Added,
        CollectionEvent::Edited,
        CollectionEvent::Deleted,
        CollectionEvent::ActiveChanged,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CollectionEvent::Added => "CollectionAdded",
            CollectionEvent::Edited => "CollectionEdited",
            CollectionEvent::Deleted => "CollectionDeleted",
            CollectionEvent::ActiveChanged => "ActiveCollectionChanged",
        }
    }
}

impl fmt::Display for CollectionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Payload of every notification: the affected collection and nothing else.
/// Listeners re-fetch whatever else they need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionChanged {
    pub collection_id: CollectionId,
}

/// Handle returned by [`Listeners::register`], used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Ordered list of listeners for one event type.
pub struct Listeners<E> {
    entries: Mutex<Vec<(ListenerId, Listener<E>)>>,
    next_id: AtomicU64,
}

impl<E> Listeners<E> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Add a listener at the end of the list.
    pub fn register<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries().push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unregister(&self, id: ListenerId) -> bool {
        let mut entries = self.entries();
        let len_before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() < len_before
    }

    /// Call every listener with `event`, in registration order.
    ///
    /// Listeners see the list as it was when notification started, so a
    /// listener may register or unregister others without blocking.
    /// Returns the number of listeners called.
    pub fn notify(&self, event: &E) -> usize {
        let snapshot: Vec<Listener<E>> = self
            .entries()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in &snapshot {
            listener(event);
        }
        snapshot.len()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    fn entries(&self) -> MutexGuard<'_, Vec<(ListenerId, Listener<E>)>> {
        // The list is only ever pushed to or filtered, so it stays usable after a poison.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Listeners<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.len())
            .finish()
    }
}

/// The four notification streams of the collection service.
#[derive(Debug, Default)]
pub struct ChangeNotifier {
    added: Listeners<CollectionChanged>,
    edited: Listeners<CollectionChanged>,
    deleted: Listeners<CollectionChanged>,
    active_changed: Listeners<CollectionChanged>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn added(&self) -> &Listeners<CollectionChanged> {
        &self.added
    }

    pub fn edited(&self) -> &Listeners<CollectionChanged> {
        &self.edited
    }

    pub fn deleted(&self) -> &Listeners<CollectionChanged> {
        &self.deleted
    }

    pub fn active_changed(&self) -> &Listeners<CollectionChanged> {
        &self.active_changed
    }

    /// Listener list for one kind of change.
    pub fn stream(&self, event: CollectionEvent) -> &Listeners<CollectionChanged> {
        match event {
            CollectionEvent::Added => &self.added,
            CollectionEvent::Edited => &self.edited,
            CollectionEvent::Deleted => &self.deleted,
            CollectionEvent::ActiveChanged => &self.active_changed,
        }
    }

    /// Deliver `event` for `id` to its stream.
    pub fn notify(&self, event: CollectionEvent, id: &CollectionId) -> usize {
        let payload = CollectionChanged {
            collection_id: id.clone(),
        };
        let delivered = self.stream(event).notify(&payload);
        debug!("{} id={} delivered to {} listener(s)", event, id, delivered);
        delivered
    }
}
