//! Test doubles for the collection service.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use crate::events::{ChangeNotifier, CollectionEvent};
use shelf_common::{CollectionId, Error, Result};
use shelf_storage::{Collection, CollectionProvider};

/// What a scripted method answers with.
#[derive(Debug, Clone)]
pub(crate) enum Reply<T> {
    Return(T),
    Fail,
}

impl<T: Clone> Reply<T> {
    fn get(&self, method: &str) -> Result<T> {
        match self {
            Reply::Return(value) => Ok(value.clone()),
            Reply::Fail => Err(Error::Io(std::io::Error::other(format!(
                "scripted {method} failure"
            )))),
        }
    }
}

/// Provider whose answers are set up front and whose calls are counted.
///
/// By default nothing exists, `add` hands out `c1`, and every other
/// mutation succeeds.
pub(crate) struct ScriptedProvider {
    find: Reply<Option<CollectionId>>,
    add: Reply<Option<CollectionId>>,
    delete: Reply<bool>,
    edit: Reply<bool>,
    activate: Reply<bool>,
    list: Reply<Vec<Collection>>,
    calls: Mutex<HashMap<&'static str, usize>>,
}

pub(crate) fn id(value: &str) -> CollectionId {
    CollectionId::new(value).unwrap()
}

impl ScriptedProvider {
    pub(crate) fn new() -> Self {
        Self {
            find: Reply::Return(None),
            add: Reply::Return(Some(id("c1"))),
            delete: Reply::Return(true),
            edit: Reply::Return(true),
            activate: Reply::Return(true),
            list: Reply::Return(Vec::new()),
            calls: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn on_find(mut self, reply: Reply<Option<CollectionId>>) -> Self {
        self.find = reply;
        self
    }

    pub(crate) fn on_add(mut self, reply: Reply<Option<CollectionId>>) -> Self {
        self.add = reply;
        self
    }

    pub(crate) fn on_delete(mut self, reply: Reply<bool>) -> Self {
        self.delete = reply;
        self
    }

    pub(crate) fn on_edit(mut self, reply: Reply<bool>) -> Self {
        self.edit = reply;
        self
    }

    pub(crate) fn on_activate(mut self, reply: Reply<bool>) -> Self {
        self.activate = reply;
        self
    }

    pub(crate) fn on_list(mut self, reply: Reply<Vec<Collection>>) -> Self {
        self.list = reply;
        self
    }

    pub(crate) fn calls(&self, method: &str) -> usize {
        self.calls.lock().unwrap().get(method).copied().unwrap_or(0)
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    fn record(&self, method: &'static str) {
        *self.calls.lock().unwrap().entry(method).or_insert(0) += 1;
    }
}

#[async_trait]
impl CollectionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn find_id_by_title(&self, _title: &str) -> Result<Option<CollectionId>> {
        self.record("find_id_by_title");
        self.find.get("find_id_by_title")
    }

    async fn add(&self, _title: &str, _is_active: bool) -> Result<Option<CollectionId>> {
        self.record("add");
        self.add.get("add")
    }

    async fn delete(&self, _id: &CollectionId) -> Result<bool> {
        self.record("delete");
        self.delete.get("delete")
    }

    async fn edit(&self, _id: &CollectionId, _new_title: &str) -> Result<bool> {
        self.record("edit");
        self.edit.get("edit")
    }

    async fn activate(&self, _id: &CollectionId) -> Result<bool> {
        self.record("activate");
        self.activate.get("activate")
    }

    async fn list_all(&self) -> Result<Vec<Collection>> {
        self.record("list_all");
        self.list.get("list_all")
    }
}

/// Notifications seen on any stream, as `(event, id)` pairs.
pub(crate) type Recorded = Arc<Mutex<Vec<(CollectionEvent, String)>>>;

/// Subscribe to every stream of `notifier` and record what arrives.
pub(crate) fn record_notifications(notifier: &ChangeNotifier) -> Recorded {
    let recorded: Recorded = Arc::new(Mutex::new(Vec::new()));
    for event in CollectionEvent::ALL {
        let recorded = recorded.clone();
        notifier.stream(event).register(move |change| {
            recorded
                .lock()
                .unwrap()
                .push((event, change.collection_id.to_string()));
        });
    }
    recorded
}

/// Counts ERROR-level events.
struct ErrorCounter(Arc<AtomicUsize>);

impl<S: Subscriber> Layer<S> for ErrorCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::ERROR {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Count ERROR events on this thread while the returned guard is alive.
///
/// Use with the current-thread runtime of `#[tokio::test]` so every event
/// is emitted on the test thread.
pub(crate) fn count_errors() -> (DefaultGuard, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(ErrorCounter(count.clone()));
    (tracing::subscriber::set_default(subscriber), count)
}
