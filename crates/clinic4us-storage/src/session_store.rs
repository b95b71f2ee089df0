//! Persisted session state.
//!
//! Two well-known slots: the session record (a JSON document) and the
//! remember-me flag. The password is never part of either. A corrupt
//! record is discarded and its slot cleared; the caller only ever sees
//! "no session", never a deserialization error.

use crate::error::StorageResult;
use crate::kv::KeyValueStorage;
use clinic4us_core::SessionRecord;
use std::sync::Arc;
use tracing::{debug, warn};

/// Well-known key for the persisted session record.
pub const SESSION_KEY: &str = "clinic4us_session";

/// Well-known key for the remember-me flag.
pub const REMEMBER_ME_KEY: &str = "clinic4us_remember_me";

/// Load/save/clear access to the persisted session.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStorage>,
    session_key: String,
    remember_key: String,
}

impl SessionStore {
    /// Creates a store over the given backend using the well-known keys.
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self::with_keys(storage, SESSION_KEY, REMEMBER_ME_KEY)
    }

    /// Creates a store with custom slot keys.
    pub fn with_keys(
        storage: Arc<dyn KeyValueStorage>,
        session_key: impl Into<String>,
        remember_key: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            session_key: session_key.into(),
            remember_key: remember_key.into(),
        }
    }

    /// Loads the persisted session record.
    ///
    /// Fail-safe: backend errors and malformed documents yield `None`, and a
    /// malformed document additionally clears its slot so the corruption is
    /// not observed twice.
    pub fn load(&self) -> Option<SessionRecord> {
        let raw = match self.storage.get(&self.session_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "failed to read persisted session; treating as no session");
                return None;
            }
        };
        match serde_json::from_str::<SessionRecord>(&raw) {
            Ok(record) if record.session_duration > 0 => Some(record),
            Ok(_) => {
                warn!("persisted session has a zero duration; clearing slot");
                self.clear_corrupt_slot();
                None
            }
            Err(e) => {
                warn!(error = %e, "persisted session is corrupt; clearing slot");
                self.clear_corrupt_slot();
                None
            }
        }
    }

    fn clear_corrupt_slot(&self) {
        if let Err(e) = self.storage.remove(&self.session_key) {
            warn!(error = %e, "failed to clear corrupt session slot");
        }
    }

    /// Saves the complete record in one write.
    pub fn save(&self, record: &SessionRecord) -> StorageResult<()> {
        let json = serde_json::to_string(record)?;
        self.storage.set(&self.session_key, &json)?;
        debug!(email = %record.email, "session record saved");
        Ok(())
    }

    /// Removes the session record and the remember-me flag.
    pub fn clear(&self) -> StorageResult<()> {
        self.storage.remove(&self.session_key)?;
        self.storage.remove(&self.remember_key)?;
        Ok(())
    }

    /// Reads the remember-me flag; absent or unreadable reads as `false`.
    pub fn remember_me(&self) -> bool {
        match self.storage.get(&self.remember_key) {
            Ok(Some(v)) => v == "true",
            _ => false,
        }
    }

    /// Persists the remember-me flag.
    pub fn set_remember_me(&self, remember: bool) -> StorageResult<()> {
        self.storage
            .set(&self.remember_key, if remember { "true" } else { "false" })
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("session_key", &self.session_key)
            .field("remember_key", &self.remember_key)
            .finish()
    }
}
