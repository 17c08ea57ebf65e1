//! # Document
//! A document is a JSON object stored under an id inside a collection. The id is not part of the object;
//! it travels next to it in a [`DocumentSnapshot`].

use serde::{Serialize, de::DeserializeOwned};

use crate::StoreError;

pub type DocumentData = serde_json::Map<String, serde_json::Value>;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DocumentSnapshot {
    pub id: String,
    pub data: DocumentData,
}

impl DocumentSnapshot {
    pub fn new(id: impl Into<String>, data: DocumentData) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
        self.data.get(field)
    }

    /// Decodes the document body. Unknown fields are ignored unless `T` says otherwise.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(serde_json::Value::Object(self.data.clone()))
    }
}

/// Serializes `value` into a document body. Anything that isn't a JSON object is rejected.
pub fn to_document_data<T: Serialize>(value: &T) -> Result<DocumentData, StoreError> {
    match serde_json::to_value(value)? {
        serde_json::Value::Object(data) => Ok(data),
        other => Err(StoreError::InvalidArgument(format!(
            "documents must be JSON objects, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq)]
    struct Body {
        content: String,
    }

    #[test]
    fn test_to_document_data_rejects_non_objects() {
        assert!(to_document_data(&"just a string").is_err());
        assert!(to_document_data(&vec![1, 2, 3]).is_err());
    }

    #[test]
    fn test_deserialize_ignores_extra_fields() {
        let mut data = to_document_data(&Body {
            content: "hi".to_string(),
        })
        .unwrap();
        data.insert("extra".to_string(), serde_json::json!(42));

        let snapshot = DocumentSnapshot::new("a", data);
        assert_eq!(snapshot.get("extra"), Some(&serde_json::json!(42)));
        assert_eq!(
            snapshot.deserialize::<Body>().unwrap(),
            Body {
                content: "hi".to_string()
            }
        );
    }
}
