//! Owned-state wiring for the core: one context object holds the session
//! manager and the request store with an explicit lifecycle, instead of
//! ambient framework-managed globals.

use std::sync::Arc;

use crate::identity::{CredentialStore, SessionManager, SessionStore};
use crate::requests::{CategoryCatalog, RequestStore};

pub struct ServiceContext {
    pub sessions: SessionManager,
    pub requests: RequestStore,
}

impl ServiceContext {
    /// Wire the core against its collaborators. Consumers pass the context
    /// (or references to its parts) down explicitly.
    pub fn init(
        credentials: Arc<dyn CredentialStore>,
        session_store: Arc<dyn SessionStore>,
        catalog: Arc<dyn CategoryCatalog>,
    ) -> Self {
        Self {
            sessions: SessionManager::new(credentials, session_store),
            requests: RequestStore::new(catalog),
        }
    }

    /// Drop in-memory request state. Persisted session state is left for the
    /// next process to restore; call `sessions.logout()` first to end the
    /// session for good.
    pub fn teardown(&self) {
        self.requests.load(Vec::new());
    }
}
