//! # DirtyTracker
//! A DirtyTracker is a wrapper around any type, that adds a "dirty" flag. This is used to track whether a
//! collection has been written to since its subscribers were last notified.

use std::ops::{Deref, DerefMut};

#[derive(Clone, Debug, Default)]
pub struct DirtyTracker<Store> {
    store: Store,
    dirty: bool,
}

/// Smart pointer that marks the store as dirty when dereferenced mutably
pub struct DirtyOnDerefMut<'a, Store> {
    store: &'a mut Store,
    dirty: &'a mut bool,
}

impl<'a, Store> Deref for DirtyOnDerefMut<'a, Store> {
    type Target = Store;

    fn deref(&self) -> &Self::Target {
        self.store
    }
}

impl<'a, Store> DerefMut for DirtyOnDerefMut<'a, Store> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        *self.dirty = true;
        self.store
    }
}

impl<Store> DirtyTracker<Store> {
    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn store_mut(&mut self) -> DirtyOnDerefMut<'_, Store> {
        DirtyOnDerefMut {
            store: &mut self.store,
            dirty: &mut self.dirty,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_stay_clean() {
        let mut tracker: DirtyTracker<Vec<i32>> = DirtyTracker::default();
        assert!(!tracker.is_dirty());

        let view = tracker.store_mut();
        assert!(view.is_empty());
        drop(view);
        assert!(!tracker.is_dirty());
    }

    #[test]
    fn test_writes_mark_dirty() {
        let mut tracker: DirtyTracker<Vec<i32>> = DirtyTracker::default();
        tracker.store_mut().push(1);
        assert!(tracker.is_dirty());
        assert_eq!(tracker.store(), &vec![1]);

        tracker.mark_clean();
        assert!(!tracker.is_dirty());
    }
}
