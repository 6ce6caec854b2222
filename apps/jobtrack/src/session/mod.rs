//! Process-wide session context.
//!
//! Created once at startup with `SessionContext::init`, which reads the persisted session.
//! Cloned into the API client and every view; all clones share the same state.

pub mod store;

use std::sync::{Arc, PoisonError, RwLock};

use tracing::{info, warn};

use crate::errors::ClientError;
use crate::models::user::{Session, User};
use crate::session::store::SessionStore;

#[derive(Clone)]
pub struct SessionContext {
    current: Arc<RwLock<Option<Session>>>,
    store: Arc<dyn SessionStore>,
}

impl SessionContext {
    /// Reads the persisted session (if any) and makes it current.
    pub fn init(store: Arc<dyn SessionStore>) -> Result<Self, ClientError> {
        let persisted = store.load()?;
        if let Some(session) = &persisted {
            info!("Restored session for {}", session.user.email);
        }
        Ok(Self {
            current: Arc::new(RwLock::new(persisted)),
            store,
        })
    }

    /// Persists `token` and `user`, then makes them the current session.
    pub fn login(&self, token: String, user: User) -> Result<(), ClientError> {
        let session = Session { token, user };
        self.store.save(&session)?;
        info!("Logged in as {}", session.user.email);
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(session);
        Ok(())
    }

    /// Clears the persisted entries and invalidates the current session.
    /// The in-memory session is dropped even if the store cannot be cleared.
    pub fn logout(&self) -> Result<(), ClientError> {
        let previous = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(session) = previous {
            info!("Logged out {}", session.user.email);
        }
        self.store.clear().inspect_err(|e| {
            warn!("Failed to clear persisted session: {e}");
        })
    }

    pub fn token(&self) -> Option<String> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.token.clone())
    }

    pub fn user(&self) -> Option<User> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
