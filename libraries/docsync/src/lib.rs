//! This is a library for mirroring a hosted document database on the client.
//! It was created for a notes front end, so it only covers what that needed.
//!
//! Model:
//! 1. Documents live in collections addressed by slash-separated paths (`users/{uid}/notes`).
//! 2. A [`Query`](data_model::Query) selects a collection and orders its documents by one or more fields.
//! 3. Subscribing to a query yields a [`Subscription`]. Every time the collection changes, the subscriber
//!    receives the *full* current result set as a [`QuerySnapshot`](data_model::QuerySnapshot).
//! 4. Writes (add/update/delete) go straight to the store. Subscribers only see them through the next snapshot.
//!
//! Backends implement [`DocumentStore`]. [`memory::MemoryStore`] is the in-process one.

pub mod data_model;
pub mod memory;

mod error;
mod subscription;

use std::future::Future;

pub use error::StoreError;
pub use subscription::Subscription;

use crate::data_model::{CollectionPath, DocumentData, DocumentPath, Query, QuerySnapshot};

pub trait DocumentStore {
    /// Creates a document with a store-assigned id.
    fn add_document(
        &self,
        collection: &CollectionPath,
        data: DocumentData,
    ) -> impl Future<Output = Result<DocumentPath, StoreError>>;

    /// Merges `data` into an existing document. Fields not named in `data` are left alone.
    fn update_document(
        &self,
        document: &DocumentPath,
        data: DocumentData,
    ) -> impl Future<Output = Result<(), StoreError>>;

    fn delete_document(
        &self,
        document: &DocumentPath,
    ) -> impl Future<Output = Result<(), StoreError>>;

    /// `on_next` is invoked with the full result set after every change, starting with
    /// the current contents. `on_error` is invoked at most once, after which the
    /// subscription is dead.
    fn on_snapshot(
        &self,
        query: Query,
        on_next: impl Fn(QuerySnapshot) + 'static,
        on_error: impl Fn(StoreError) + 'static,
    ) -> Subscription;
}
