use std::cell::RefCell;
use std::rc::Rc;

use docsync::data_model::{CollectionPath, Direction, Query, QuerySnapshot, to_document_data};
use docsync::{DocumentStore, StoreError, Subscription};

use crate::auth::{AuthProvider, User};
use crate::config::NotesConfig;
use crate::error::NotesError;
use crate::note::{ContentPatch, DATE_FIELD, Note, NoteFields, now_millis, sort_newest_first};

#[derive(Default)]
struct NotesState {
    notes: im::Vector<Note>,
    notes_loaded: bool,
    /// True while the store is delivering snapshots. A store-side error ends delivery.
    listening: bool,
    /// Bumped whenever a subscription is released, so snapshots that were already in flight are ignored.
    generation: u64,
}

/// Everything that depends on who is signed in. Rebuilt on every `initialize`.
struct Binding {
    user: User,
    collection: CollectionPath,
    query: Query,
}

pub struct NotesSession<S: DocumentStore, A: AuthProvider> {
    store: S,
    auth: A,
    config: NotesConfig,

    // shared with the snapshot listener. never borrowed across an .await
    state: Rc<RefCell<NotesState>>,
    binding: Option<Binding>,
    subscription: Option<Subscription>,
}

impl<S: DocumentStore, A: AuthProvider> NotesSession<S, A> {
    pub fn new(store: S, auth: A) -> Self {
        Self::with_config(store, auth, NotesConfig::default())
    }

    pub fn with_config(store: S, auth: A, config: NotesConfig) -> Self {
        crate::init_logging();

        Self {
            store,
            auth,
            config,
            state: Rc::new(RefCell::new(NotesState::default())),
            binding: None,
            subscription: None,
        }
    }

    /// Binds the session to the signed-in user's collection and subscribes to it.
    /// A subscription left over from a previous `initialize` is released first.
    pub fn initialize(&mut self) -> Result<(), NotesError> {
        let user = self
            .auth
            .current_user()
            .ok_or(NotesError::NotAuthenticated)?;
        let collection = self.config.collection_for(&user)?;
        let query = Query::new(collection.clone()).order_by(DATE_FIELD, Direction::Descending);

        log::info!("Initializing notes for {collection}");
        self.release_subscription();
        self.binding = Some(Binding {
            user,
            collection,
            query,
        });

        self.subscribe()
    }

    pub fn subscribe(&mut self) -> Result<(), NotesError> {
        let query = self.binding()?.query.clone();
        self.release_subscription();

        let generation = {
            let mut state = self.state.borrow_mut();
            state.notes_loaded = false;
            state.listening = true;
            state.generation
        };

        let on_next = {
            let state = Rc::downgrade(&self.state);
            move |snapshot: QuerySnapshot| {
                if let Some(state) = state.upgrade() {
                    apply_snapshot(&state, generation, snapshot);
                }
            }
        };
        let on_error = {
            let state = Rc::downgrade(&self.state);
            move |error: StoreError| {
                log::error!("Error listening to notes: {error}");
                if let Some(state) = state.upgrade() {
                    let mut state = state.borrow_mut();
                    if state.generation == generation {
                        state.listening = false;
                    }
                }
            }
        };

        self.subscription = Some(self.store.on_snapshot(query, on_next, on_error));
        Ok(())
    }

    /// Returns the id the store assigned. The note shows up in [`Self::notes`] with the next snapshot.
    pub async fn add_note(&self, content: &str) -> Result<String, NotesError> {
        let collection = &self.binding()?.collection;
        let data = to_document_data(&NoteFields {
            content: content.to_string(),
            date: now_millis(),
        })?;

        let document = self.store.add_document(collection, data).await?;
        log::debug!("Added note {document}");
        Ok(document.id().to_string())
    }

    pub async fn delete_note(&self, id: &str) -> Result<(), NotesError> {
        let document = self.binding()?.collection.doc(id)?;
        self.store.delete_document(&document).await?;
        log::debug!("Deleted note {document}");
        Ok(())
    }

    /// Only `content` is sent; the note's date is left as it was.
    pub async fn update_note(&self, id: &str, content: &str) -> Result<(), NotesError> {
        let document = self.binding()?.collection.doc(id)?;
        let data = to_document_data(&ContentPatch { content })?;
        self.store.update_document(&document, data).await?;
        log::debug!("Updated note {document}");
        Ok(())
    }

    /// Empties the cache and stops listening. Meant for sign-out; safe to call any number of times.
    /// The session must be initialized again before it can be used.
    pub fn clear_notes(&mut self) {
        self.release_subscription();
        if let Some(binding) = self.binding.take() {
            log::info!("Cleared notes for {}", binding.collection);
        }

        let mut state = self.state.borrow_mut();
        state.notes = im::Vector::new();
        state.notes_loaded = false;
    }

    fn release_subscription(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        let mut state = self.state.borrow_mut();
        state.listening = false;
        state.generation += 1;
    }

    fn binding(&self) -> Result<&Binding, NotesError> {
        self.binding.as_ref().ok_or(NotesError::NotInitialized)
    }
}

fn apply_snapshot(state: &RefCell<NotesState>, generation: u64, snapshot: QuerySnapshot) {
    log::debug!(
        "Notes snapshot with {} documents, read at {}",
        snapshot.len(),
        snapshot.read_time
    );
    let mut notes: Vec<Note> = snapshot
        .iter()
        .filter_map(|document| {
            Note::from_snapshot(document)
                .inspect_err(|e| log::warn!("Skipping unreadable note {}: {e}", document.id))
                .ok()
        })
        .collect();
    sort_newest_first(&mut notes);

    let mut state = state.borrow_mut();
    if state.generation != generation {
        log::debug!("Ignoring snapshot from a released subscription");
        return;
    }
    state.notes = notes.into_iter().collect();
    state.notes_loaded = true;
}

// =======
// read-only views of the cache
// =======

impl<S: DocumentStore, A: AuthProvider> NotesSession<S, A> {
    /// The cached notes, newest first. Cheap to call; the list is structurally shared.
    pub fn notes(&self) -> im::Vector<Note> {
        self.state.borrow().notes.clone()
    }

    /// False from the moment a subscription is requested until its first snapshot arrives.
    pub fn notes_loaded(&self) -> bool {
        self.state.borrow().notes_loaded
    }

    /// False once the store has ended the subscription with an error, even though the handle is
    /// still held until the next `subscribe` or `clear_notes`.
    pub fn is_subscribed(&self) -> bool {
        self.state.borrow().listening
            && self
                .subscription
                .as_ref()
                .is_some_and(Subscription::is_active)
    }

    pub fn user_id(&self) -> Option<&str> {
        self.binding.as_ref().map(|binding| binding.user.id.as_str())
    }

    pub fn find_note(&self, id: &str) -> Option<Note> {
        self.state
            .borrow()
            .notes
            .iter()
            .find(|note| note.id == id)
            .cloned()
    }

    pub fn content_of(&self, id: &str) -> Result<String, NotesError> {
        self.find_note(id)
            .map(|note| note.content)
            .ok_or_else(|| NotesError::NoteNotFound(id.to_string()))
    }

    pub fn count(&self) -> usize {
        self.state.borrow().notes.len()
    }

    pub fn total_characters(&self) -> usize {
        self.state
            .borrow()
            .notes
            .iter()
            .map(Note::character_count)
            .sum()
    }
}
