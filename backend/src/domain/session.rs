use anyhow::{anyhow, Result};
use shared::UserProfile;
use std::sync::{Arc, Mutex};

use crate::storage::traits::TokenProvider;

/// A signed-in session as issued by the authentication service
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub profile: UserProfile,
    pub id_token: String,
    pub refresh_token: String,
}

/// Shared handle to the current session.
///
/// This is the only piece of mutable state the services share: set on
/// sign-in, cleared on sign-out, read by everything that acts on behalf
/// of the signed-in user.
#[derive(Clone, Default)]
pub struct SessionHandle {
    inner: Arc<Mutex<Option<Session>>>,
}

impl SessionHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, session: Session) {
        *self.inner.lock().unwrap() = Some(session);
    }

    pub fn clear(&self) {
        *self.inner.lock().unwrap() = None;
    }

    pub fn current(&self) -> Option<Session> {
        self.inner.lock().unwrap().clone()
    }

    /// The session, or an error message suitable for display
    pub fn require(&self) -> Result<Session> {
        self.current().ok_or_else(|| anyhow!("No signed-in user"))
    }
}

impl TokenProvider for SessionHandle {
    fn bearer_token(&self) -> Option<String> {
        self.current().map(|session| session.id_token)
    }
}
