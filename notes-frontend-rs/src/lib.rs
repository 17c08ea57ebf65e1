//! Client-side cache of one signed-in user's notes.
//!
//! [`NotesSession`] subscribes to `users/{uid}/notes`, rebuilds its list from every snapshot the store
//! pushes, and forwards add/update/delete straight to the store. It never edits its own list; changes
//! show up when the store notifies.

mod auth;
mod config;
mod error;
mod note;
mod session;
mod utils;

pub use auth::{AuthProvider, AuthState, User};
pub use config::NotesConfig;
pub use error::NotesError;
pub use note::Note;
pub use session::NotesSession;

pub use utils::init_logging;
