use std::sync::{Arc, PoisonError, RwLock};
use tracing::{info, warn};

use crate::error::Result;
use crate::storage::KeyValueStorage;

/// Storage key holding the JSON-encoded session id.
pub const SESSION_KEY: &str = "userID";

/// Owner of the anonymous session id issued by the calculation service.
///
/// The id starts empty and is only ever replaced by [`SessionStore::set`].
/// Callers see `get`/`set` and nothing of the storage underneath.
pub struct SessionStore {
    id: RwLock<String>,
    storage: Arc<dyn KeyValueStorage>,
}

impl SessionStore {
    /// Load the persisted id from `storage`.
    ///
    /// Any read or decode failure yields an empty session. This is the
    /// intended fallback: a broken value must never keep the client from
    /// starting.
    pub async fn load(storage: Arc<dyn KeyValueStorage>) -> Self {
        let id = match storage.get(SESSION_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<String>(&raw) {
                Ok(id) => id,
                Err(e) => {
                    warn!(error = %e, "Discarding undecodable persisted session id");
                    String::new()
                }
            },
            Ok(None) => String::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read persisted session id");
                String::new()
            }
        };

        if !id.is_empty() {
            info!(session_id = %id, "Restored session");
        }

        Self {
            id: RwLock::new(id),
            storage,
        }
    }

    /// Current session id, empty when no calculation has succeeded yet.
    pub fn get(&self) -> String {
        self.id
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_active(&self) -> bool {
        !self
            .id
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    /// Replace the session id and persist it with exactly one storage write.
    pub async fn set(&self, id: impl Into<String>) -> Result<()> {
        let id = id.into();
        let encoded = serde_json::to_string(&id)?;
        *self.id.write().unwrap_or_else(PoisonError::into_inner) = id;
        self.storage.set(SESSION_KEY, encoded).await
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("id", &self.get())
            .finish_non_exhaustive()
    }
}
