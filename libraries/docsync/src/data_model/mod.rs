#[path = "1-document.rs"]
mod document;

#[path = "2-path.rs"]
mod path;

#[path = "3-query.rs"]
mod query;

#[path = "4-snapshot.rs"]
mod snapshot;

#[path = "5-dirty-tracker.rs"]
mod dirty_tracker;

pub use dirty_tracker::*;
pub use document::*;
pub use path::*;
pub use query::*;
pub use snapshot::*;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ListenerKey(pub(crate) slotmap::DefaultKey);
