//! # Subscription
//! The handle returned by [`DocumentStore::on_snapshot`](crate::DocumentStore::on_snapshot).
//! Releasing it (explicitly or by dropping it) stops delivery. Releasing twice is a no-op.

pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    pub fn unsubscribe(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_release_runs_once() {
        let released = Rc::new(Cell::new(0));
        let counter = released.clone();
        let mut subscription = Subscription::new(move || counter.set(counter.get() + 1));

        assert!(subscription.is_active());
        subscription.unsubscribe();
        subscription.unsubscribe();
        drop(subscription);

        assert_eq!(released.get(), 1);
    }

    #[test]
    fn test_drop_releases() {
        let released = Rc::new(Cell::new(false));
        let flag = released.clone();
        {
            let _subscription = Subscription::new(move || flag.set(true));
        }
        assert!(released.get());
    }
}
