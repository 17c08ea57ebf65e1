use std::cmp::Reverse;

use chrono::{DateTime, Utc};
use docsync::data_model::DocumentSnapshot;
use serde::{Deserialize, Deserializer, Serialize};

pub(crate) const DATE_FIELD: &str = "date";

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    /// Creation time in epoch milliseconds, as text.
    pub date: String,
    pub content: String,
}

/// What is stored in a note document. The id is the document's own id.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct NoteFields {
    pub content: String,
    #[serde(deserialize_with = "date_text")]
    pub date: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ContentPatch<'a> {
    pub content: &'a str,
}

// Older documents may carry the date as a bare number.
fn date_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum DateRepr {
        Text(String),
        Millis(i64),
    }

    Ok(match DateRepr::deserialize(deserializer)? {
        DateRepr::Text(text) => text,
        DateRepr::Millis(millis) => millis.to_string(),
    })
}

impl Note {
    pub fn from_snapshot(snapshot: &DocumentSnapshot) -> Result<Self, serde_json::Error> {
        let NoteFields { content, date } = snapshot.deserialize()?;
        Ok(Self {
            id: snapshot.id.clone(),
            date,
            content,
        })
    }

    /// `None` when the date isn't an integer.
    pub fn date_millis(&self) -> Option<i64> {
        self.date.trim().parse().ok()
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.date_millis()?)
    }

    /// Length in Unicode scalar values.
    pub fn character_count(&self) -> usize {
        self.content.chars().count()
    }
}

pub(crate) fn now_millis() -> String {
    Utc::now().timestamp_millis().to_string()
}

/// Numeric date, newest first. Stable, so equal dates keep the order the store gave them.
/// Notes with an unreadable date go last.
pub(crate) fn sort_newest_first(notes: &mut [Note]) {
    notes.sort_by_key(|note| Reverse(note.date_millis()));
}
