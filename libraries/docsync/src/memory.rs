//! In-process [`DocumentStore`]. Single-threaded: the handle is cheap to clone and every clone sees the
//! same collections.
//!
//! Notifications are never delivered while the store is borrowed. Due notifications are drained into
//! closures first and invoked afterwards, so listeners are free to call back into the store.
//! Writes flush on completion. A freshly registered listener gets its first snapshot on the next flush,
//! not during registration.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::rc::Rc;

use crate::data_model::{
    CollectionPath, DirtyOnDerefMut, DirtyTracker, DocumentData, DocumentPath, DocumentSnapshot,
    ListenerKey, Query, QuerySnapshot,
};
use crate::{DocumentStore, StoreError, Subscription};

type Documents = BTreeMap<String, DocumentData>;

/// A write request the store accepted, as it was received.
#[derive(Clone, Debug, PartialEq)]
pub enum Write {
    Add {
        document: DocumentPath,
        data: DocumentData,
    },
    Update {
        document: DocumentPath,
        data: DocumentData,
    },
    Delete {
        document: DocumentPath,
    },
}

struct Listener {
    query: Query,
    on_next: Rc<dyn Fn(QuerySnapshot)>,
    on_error: Rc<dyn Fn(StoreError)>,
    awaiting_first_snapshot: bool,
}

#[derive(Default)]
struct Inner {
    collections: HashMap<CollectionPath, DirtyTracker<Documents>>,
    listeners: slotmap::SlotMap<slotmap::DefaultKey, Listener>,
    revoked: HashSet<CollectionPath>,
    writes: Vec<Write>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    // never hold a borrow across an .await or while invoking a listener
    inner: Rc<RefCell<Inner>>,
}

fn snapshot_of(collections: &HashMap<CollectionPath, DirtyTracker<Documents>>, query: &Query) -> QuerySnapshot {
    let documents = collections
        .get(query.collection())
        .map(|collection| {
            collection
                .store()
                .iter()
                .map(|(id, data)| DocumentSnapshot::new(id.clone(), data.clone()))
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    QuerySnapshot::new(query.apply(documents))
}

impl Inner {
    fn check_access(&self, collection: &CollectionPath) -> Result<(), StoreError> {
        if self.revoked.contains(collection) {
            return Err(StoreError::PermissionDenied(collection.to_string()));
        }
        Ok(())
    }

    fn contains(&self, document: &DocumentPath) -> bool {
        self.collections
            .get(document.collection())
            .is_some_and(|collection| collection.store().contains_key(document.id()))
    }

    fn collection_mut(&mut self, collection: &CollectionPath) -> DirtyOnDerefMut<'_, Documents> {
        self.collections
            .entry(collection.clone())
            .or_default()
            .store_mut()
    }

    fn drain_due_notifications(&mut self) -> Vec<Box<dyn FnOnce()>> {
        let mut notifications: Vec<Box<dyn FnOnce()>> = Vec::new();
        let mut terminated = Vec::new();

        for (key, listener) in self.listeners.iter_mut() {
            let collection = listener.query.collection();

            if self.revoked.contains(collection) {
                let on_error = listener.on_error.clone();
                let path = collection.to_string();
                notifications.push(Box::new(move || on_error(StoreError::PermissionDenied(path))));
                terminated.push(key);
                continue;
            }

            let changed = self
                .collections
                .get(collection)
                .is_some_and(|collection| collection.is_dirty());
            if !changed && !listener.awaiting_first_snapshot {
                continue;
            }
            listener.awaiting_first_snapshot = false;

            let snapshot = snapshot_of(&self.collections, &listener.query);
            let on_next = listener.on_next.clone();
            notifications.push(Box::new(move || on_next(snapshot)));
        }

        for key in terminated {
            self.listeners.remove(key);
        }
        // Reset to clean after draining
        for collection in self.collections.values_mut() {
            collection.mark_clean();
        }

        notifications
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers every due notification. Returns how many callbacks ran.
    pub fn flush_notifications(&self) -> usize {
        // do it like this to avoid holding the borrow while we call the callbacks
        let notifications = self.inner.borrow_mut().drain_due_notifications();
        let delivered = notifications.len();
        for notification in notifications {
            notification();
        }
        delivered
    }

    pub fn register_listener(
        &self,
        query: Query,
        on_next: impl Fn(QuerySnapshot) + 'static,
        on_error: impl Fn(StoreError) + 'static,
    ) -> ListenerKey {
        let key = self.inner.borrow_mut().listeners.insert(Listener {
            query,
            on_next: Rc::new(on_next),
            on_error: Rc::new(on_error),
            awaiting_first_snapshot: true,
        });
        ListenerKey(key)
    }

    pub fn unregister_listener(&self, key: ListenerKey) {
        self.inner.borrow_mut().listeners.remove(key.0);
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Makes the collection unreadable and unwritable. Live listeners on it receive one error and are
    /// dropped.
    pub fn revoke_access(&self, collection: &CollectionPath) {
        let _flusher = FlushLater::new(self);
        log::debug!("Revoking access to {collection}");
        self.inner.borrow_mut().revoked.insert(collection.clone());
    }

    pub fn restore_access(&self, collection: &CollectionPath) {
        self.inner.borrow_mut().revoked.remove(collection);
    }

    /// Every accepted write, oldest first.
    pub fn writes(&self) -> Vec<Write> {
        self.inner.borrow().writes.clone()
    }

    /// Current contents of a collection in id order.
    pub fn documents(&self, collection: &CollectionPath) -> Vec<DocumentSnapshot> {
        self.inner
            .borrow()
            .collections
            .get(collection)
            .map(|collection| {
                collection
                    .store()
                    .iter()
                    .map(|(id, data)| DocumentSnapshot::new(id.clone(), data.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl DocumentStore for MemoryStore {
    async fn add_document(
        &self,
        collection: &CollectionPath,
        data: DocumentData,
    ) -> Result<DocumentPath, StoreError> {
        let _flusher = FlushLater::new(self);
        let mut inner = self.inner.borrow_mut();
        inner.check_access(collection)?;

        let document = collection.doc(eyedee::auto_id())?;
        inner
            .collection_mut(collection)
            .insert(document.id().to_string(), data.clone());
        inner.writes.push(Write::Add {
            document: document.clone(),
            data,
        });
        log::debug!("Added {document}");
        Ok(document)
    }

    async fn update_document(
        &self,
        document: &DocumentPath,
        data: DocumentData,
    ) -> Result<(), StoreError> {
        let _flusher = FlushLater::new(self);
        let mut inner = self.inner.borrow_mut();
        inner.check_access(document.collection())?;
        if !inner.contains(document) {
            return Err(StoreError::NotFound(document.to_string()));
        }

        if let Some(existing) = inner
            .collection_mut(document.collection())
            .get_mut(document.id())
        {
            existing.extend(data.clone());
        }
        inner.writes.push(Write::Update {
            document: document.clone(),
            data,
        });
        log::debug!("Updated {document}");
        Ok(())
    }

    async fn delete_document(&self, document: &DocumentPath) -> Result<(), StoreError> {
        let _flusher = FlushLater::new(self);
        let mut inner = self.inner.borrow_mut();
        inner.check_access(document.collection())?;
        if !inner.contains(document) {
            return Err(StoreError::NotFound(document.to_string()));
        }

        inner
            .collection_mut(document.collection())
            .remove(document.id());
        inner.writes.push(Write::Delete {
            document: document.clone(),
        });
        log::debug!("Deleted {document}");
        Ok(())
    }

    fn on_snapshot(
        &self,
        query: Query,
        on_next: impl Fn(QuerySnapshot) + 'static,
        on_error: impl Fn(StoreError) + 'static,
    ) -> Subscription {
        let key = self.register_listener(query, on_next, on_error);
        let inner = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = inner.upgrade() {
                MemoryStore { inner }.unregister_listener(key);
            }
        })
    }
}

/// A simple struct that flushes listeners when dropped, regardless of the code path a function takes.
/// Declare it before any borrow of the store so it drops after the borrow is released.
struct FlushLater<'a> {
    store: &'a MemoryStore,
}

impl<'a> FlushLater<'a> {
    fn new(store: &'a MemoryStore) -> Self {
        Self { store }
    }
}

impl<'a> Drop for FlushLater<'a> {
    fn drop(&mut self) {
        self.store.flush_notifications();
    }
}
