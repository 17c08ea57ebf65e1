use docsync::data_model::{CollectionPath, PathError};
use serde::{Deserialize, Serialize};

use crate::auth::User;

/// Where notes live in the document store: `{users_collection}/{uid}/{notes_collection}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotesConfig {
    pub users_collection: String,
    pub notes_collection: String,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            users_collection: "users".to_string(),
            notes_collection: "notes".to_string(),
        }
    }
}

impl NotesConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn collection_for(&self, user: &User) -> Result<CollectionPath, PathError> {
        CollectionPath::new([
            self.users_collection.as_str(),
            user.id.as_str(),
            self.notes_collection.as_str(),
        ])
    }
}
