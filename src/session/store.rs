//! Session store: single source of truth for the logged-in user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route guards read it to allow or deny a route, page services read the
//! bearer token from it, and the HTTP client calls `expire` on a 401.
//!
//! DESIGN
//! ======
//! The state is a `watch` channel holding a closed sum:
//! `Unknown` until `hydrate` runs, then `Anonymous` or `Authenticated`.
//! Guards therefore never mistake "still loading" for "logged out".
//! One store instance is created per running application and shared by
//! `Arc`; it is never reached through a global.
//!
//! ERROR HANDLING
//! ==============
//! Storage failures never escape: read/parse failures mean "no session",
//! write failures are logged and the in-memory state still changes.

use std::sync::Arc;

use tokio::sync::watch;

use super::record::{ProfileUpdate, SessionRecord};
use super::role::Role;
use super::storage::{self, Storage};
use crate::error::StorageError;

/// Storage key of the JSON session record.
pub const USER_KEY: &str = "user";
/// Storage key of the bare bearer token.
pub const TOKEN_KEY: &str = "token";

/// What the client knows about the current user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    /// Hydration has not finished yet.
    #[default]
    Unknown,
    /// Hydration finished and nobody is logged in.
    Anonymous,
    /// A user with a bearer token is logged in.
    Authenticated(SessionRecord),
}

impl SessionState {
    /// A record only counts as a session when it carries a token.
    #[must_use]
    pub fn from_record(record: SessionRecord) -> Self {
        if record.has_token() { Self::Authenticated(record) } else { Self::Anonymous }
    }

    #[must_use]
    pub fn is_determining(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(record) if record.has_token())
    }

    #[must_use]
    pub fn user(&self) -> Option<&SessionRecord> {
        match self {
            Self::Authenticated(record) => Some(record),
            _ => None,
        }
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.user().map(|u| u.role)
    }
}

pub struct SessionStore {
    storage: Arc<dyn Storage>,
    state: watch::Sender<SessionState>,
}

impl SessionStore {
    /// A store in the `Unknown` state; call [`SessionStore::hydrate`] next.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        let (state, _) = watch::channel(SessionState::Unknown);
        Self { storage, state }
    }

    /// Restore the persisted session, if any, and return the resulting state.
    ///
    /// A corrupted record is removed (with the token key) and the store
    /// starts anonymous.
    pub fn hydrate(&self) -> SessionState {
        let next = match self.read_persisted() {
            Ok(Some(record)) => {
                let state = SessionState::from_record(record);
                if let Some(user) = state.user() {
                    tracing::debug!(user_id = user.id, role = %user.role, "session restored");
                } else {
                    tracing::debug!("persisted session has no token; starting anonymous");
                }
                state
            }
            Ok(None) => SessionState::Anonymous,
            Err(e @ StorageError::Corrupt { .. }) => {
                tracing::warn!(error = %e, "discarding corrupted persisted session");
                self.clear_persisted();
                SessionState::Anonymous
            }
            Err(e) => {
                tracing::warn!(error = %e, "session storage unreadable; starting anonymous");
                SessionState::Anonymous
            }
        };
        self.state.send_replace(next.clone());
        next
    }

    fn read_persisted(&self) -> Result<Option<SessionRecord>, StorageError> {
        let Some(mut record) = storage::load_json::<SessionRecord>(self.storage.as_ref(), USER_KEY)? else {
            return Ok(None);
        };
        if !record.has_token() {
            if let Some(token) = self.storage.get_item(TOKEN_KEY)?.filter(|t| !t.is_empty()) {
                record.token = Some(token);
            }
        }
        Ok(Some(record))
    }

    /// Make `record` the active session and persist it.
    pub fn login(&self, record: SessionRecord) {
        self.persist(&record);
        tracing::info!(user_id = record.id, role = %record.role, "logged in");
        self.state.send_replace(SessionState::from_record(record));
    }

    /// Clear the active session and its persisted copy. Does not navigate.
    pub fn logout(&self) {
        self.clear_persisted();
        let previous = self.state.send_replace(SessionState::Anonymous);
        if let Some(user) = previous.user() {
            tracing::info!(user_id = user.id, "logged out");
        }
    }

    /// Drop the session after the backend rejected its token.
    ///
    /// Safe to call any number of times, concurrently; returns whether a
    /// session was active before this call.
    pub fn expire(&self) -> bool {
        self.clear_persisted();
        let previous = self.state.send_replace(SessionState::Anonymous);
        match previous.user() {
            Some(user) => {
                tracing::warn!(user_id = user.id, "session expired");
                true
            }
            None => false,
        }
    }

    /// Apply a successful profile edit. Returns the new record, or `None`
    /// when nobody is logged in.
    pub fn refresh_profile(&self, update: ProfileUpdate) -> Option<SessionRecord> {
        let current = self.current_user()?;
        let merged = current.merged_with(update);
        self.persist(&merged);
        self.state.send_replace(SessionState::from_record(merged.clone()));
        Some(merged)
    }

    fn persist(&self, record: &SessionRecord) {
        if let Err(e) = storage::save_json(self.storage.as_ref(), USER_KEY, record) {
            tracing::warn!(error = %e, "failed to persist session");
        }
        // A tokenless record must not inherit a previous session's token.
        let result = match record.token.as_deref().filter(|t| !t.is_empty()) {
            Some(token) => self.storage.set_item(TOKEN_KEY, token),
            None => self.storage.remove_item(TOKEN_KEY),
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to persist token");
        }
    }

    fn clear_persisted(&self) {
        for key in [USER_KEY, TOKEN_KEY] {
            if let Err(e) = self.storage.remove_item(key) {
                tracing::warn!(error = %e, key, "failed to clear persisted session");
            }
        }
    }

    // =========================================================================
    // READ ACCESSORS
    // =========================================================================

    /// Immutable copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn current_user(&self) -> Option<SessionRecord> {
        self.state.borrow().user().cloned()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    #[must_use]
    pub fn is_hydrated(&self) -> bool {
        !self.state.borrow().is_determining()
    }

    /// Exact role match; no role implies another.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.state.borrow().role() == Some(role)
    }

    /// The active token, falling back to the persisted token key.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        let in_memory = self.state.borrow().user().and_then(|u| u.token.clone());
        in_memory.filter(|t| !t.is_empty()).or_else(|| {
            self.storage
                .get_item(TOKEN_KEY)
                .inspect_err(|e| tracing::warn!(error = %e, "failed to read persisted token"))
                .ok()
                .flatten()
                .filter(|t| !t.is_empty())
        })
    }

    /// Receiver that observes every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Resolve once hydration has finished.
    pub async fn wait_hydrated(&self) -> SessionState {
        let mut rx = self.state.subscribe();
        match rx.wait_for(|s| !s.is_determining()).await {
            Ok(state) => state.clone(),
            Err(_) => self.snapshot(),
        }
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;
