use crate::data_model::PathError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no document at {0}")]
    NotFound(String),
    #[error("permission denied for {0}")]
    PermissionDenied(String),
    #[error(transparent)]
    InvalidPath(#[from] PathError),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("could not (de)serialize document: {0}")]
    Serialization(#[from] serde_json::Error),
}
