//! Storage of the signed-in user.
//!
//! Persistence is the platform's job; the core only needs get/save/remove.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::model::User;

pub trait CredentialStore: Send + Sync {
    fn current_user(&self) -> Option<User>;

    fn save_current_user(&self, user: User);

    fn remove_current_user(&self);
}

/// Thread-safe in-memory credential store.
///
/// Clones share the same slot.
#[derive(Clone, Default)]
pub struct InMemoryCredentialStore {
    inner: Arc<RwLock<Option<User>>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(user: User) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(user))),
        }
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn current_user(&self) -> Option<User> {
        self.inner.read().clone()
    }

    fn save_current_user(&self, user: User) {
        tracing::debug!(user_id = %user.id, "saving current user");
        *self.inner.write() = Some(user);
    }

    fn remove_current_user(&self) {
        tracing::debug!("removing current user");
        *self.inner.write() = None;
    }
}
