use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    pub id: String,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Whoever knows which user is signed in.
pub trait AuthProvider {
    fn current_user(&self) -> Option<User>;
}

/// Shared sign-in state. Clones observe the same user.
#[derive(Clone, Debug, Default)]
pub struct AuthState {
    user: Rc<RefCell<Option<User>>>,
}

impl AuthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(user: User) -> Self {
        let state = Self::new();
        state.sign_in(user);
        state
    }

    pub fn sign_in(&self, user: User) {
        log::info!("Signed in as {}", user.id);
        *self.user.borrow_mut() = Some(user);
    }

    pub fn sign_out(&self) {
        if let Some(user) = self.user.borrow_mut().take() {
            log::info!("Signed out {}", user.id);
        }
    }
}

impl AuthProvider for AuthState {
    fn current_user(&self) -> Option<User> {
        self.user.borrow().clone()
    }
}

impl AuthProvider for Option<User> {
    fn current_user(&self) -> Option<User> {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let auth = AuthState::new();
        let view = auth.clone();
        assert_eq!(view.current_user(), None);

        auth.sign_in(User::new("u1"));
        assert_eq!(view.current_user(), Some(User::new("u1")));

        view.sign_out();
        assert_eq!(auth.current_user(), None);
    }
}
