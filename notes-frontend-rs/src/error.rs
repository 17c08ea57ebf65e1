use docsync::StoreError;
use docsync::data_model::PathError;

#[derive(Debug, thiserror::Error)]
pub enum NotesError {
    #[error("no user is signed in")]
    NotAuthenticated,
    #[error("notes session is not initialized")]
    NotInitialized,
    #[error("no note with id {0}")]
    NoteNotFound(String),
    #[error(transparent)]
    InvalidPath(#[from] PathError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
