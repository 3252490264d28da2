//! Tab-scoped in-memory store.

use dashmap::DashMap;

use super::{
    DashboardSession, SessionError, SessionStore, API_KEY_KEY, BASE_URL_KEY, ENTITY_ID_KEY,
};

/// Key-value store laid out like browser session storage.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: DashMap<String, String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value under `key`, e.g. [`BASE_URL_KEY`].
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.value().clone())
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<DashboardSession>, SessionError> {
        let (Some(base_url), Some(api_key), Some(entity_id)) = (
            self.get(BASE_URL_KEY),
            self.get(API_KEY_KEY),
            self.get(ENTITY_ID_KEY),
        ) else {
            return Ok(None);
        };
        Ok(Some(DashboardSession {
            base_url,
            api_key,
            entity_id,
        }))
    }

    fn save(&self, session: &DashboardSession) -> Result<(), SessionError> {
        self.entries
            .insert(BASE_URL_KEY.to_string(), session.base_url.clone());
        self.entries
            .insert(API_KEY_KEY.to_string(), session.api_key.clone());
        self.entries
            .insert(ENTITY_ID_KEY.to_string(), session.entity_id.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        for key in [BASE_URL_KEY, API_KEY_KEY, ENTITY_ID_KEY] {
            self.entries.remove(key);
        }
        Ok(())
    }
}
