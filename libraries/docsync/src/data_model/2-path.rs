//! # Paths
//! Collections and documents alternate: `users` is a collection, `users/abc` a document inside it,
//! `users/abc/notes` a collection nested under that document. So a collection path always has an odd
//! number of segments and a document path an even number.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("path segment {index} is empty")]
    EmptySegment { index: usize },
    #[error("path segment {segment:?} contains '/'")]
    SlashInSegment { segment: String },
    #[error("a collection path needs an odd number of segments, got {0}")]
    EvenSegmentCount(usize),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionPath {
    segments: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentPath {
    collection: CollectionPath,
    id: String,
}

fn check_segment(index: usize, segment: &str) -> Result<(), PathError> {
    if segment.is_empty() {
        return Err(PathError::EmptySegment { index });
    }
    if segment.contains('/') {
        return Err(PathError::SlashInSegment {
            segment: segment.to_string(),
        });
    }
    Ok(())
}

impl CollectionPath {
    pub fn new<I, S>(segments: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        for (index, segment) in segments.iter().enumerate() {
            check_segment(index, segment)?;
        }
        if segments.len() % 2 == 0 {
            return Err(PathError::EvenSegmentCount(segments.len()));
        }
        Ok(Self { segments })
    }

    /// Parses `"users/abc/notes"`.
    pub fn parse(path: &str) -> Result<Self, PathError> {
        Self::new(path.split('/'))
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The last segment.
    pub fn id(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    pub fn doc(&self, id: impl Into<String>) -> Result<DocumentPath, PathError> {
        let id = id.into();
        check_segment(self.segments.len(), &id)?;
        Ok(DocumentPath {
            collection: self.clone(),
            id,
        })
    }
}

impl DocumentPath {
    pub fn collection(&self) -> &CollectionPath {
        &self.collection
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_collection() {
        let path = CollectionPath::new(["users", "u1", "notes"]).unwrap();
        assert_eq!(path.to_string(), "users/u1/notes");
        assert_eq!(path.id(), "notes");
        assert_eq!(CollectionPath::parse("users/u1/notes").unwrap(), path);
    }

    #[test]
    fn test_document_path() {
        let notes = CollectionPath::parse("users/u1/notes").unwrap();
        let doc = notes.doc("x1").unwrap();
        assert_eq!(doc.to_string(), "users/u1/notes/x1");
        assert_eq!(doc.id(), "x1");
        assert_eq!(doc.collection(), &notes);
    }

    #[test]
    fn test_rejects_bad_paths() {
        assert_eq!(
            CollectionPath::parse("users/u1"),
            Err(PathError::EvenSegmentCount(2))
        );
        assert_eq!(
            CollectionPath::new(["users", "", "notes"]),
            Err(PathError::EmptySegment { index: 1 })
        );
        assert_eq!(
            CollectionPath::new(Vec::<String>::new()),
            Err(PathError::EvenSegmentCount(0))
        );

        let notes = CollectionPath::parse("notes").unwrap();
        assert!(matches!(
            notes.doc("a/b"),
            Err(PathError::SlashInSegment { .. })
        ));
        assert!(matches!(notes.doc(""), Err(PathError::EmptySegment { .. })));
    }
}
