//! Dashboard session persistence.
//!
//! A session is the `{base_url, api_key, entity_id}` triple a dashboard keeps
//! between loads. Storage sits behind [`SessionStore`]; the client core never
//! touches it.

pub mod file;
pub mod memory;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::client::LedgerClient;
use crate::config::ClientConfig;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;

pub const BASE_URL_KEY: &str = "soz_baseUrl";
pub const API_KEY_KEY: &str = "soz_apiKey";
pub const ENTITY_ID_KEY: &str = "soz_entityId";

/// Connection settings remembered between dashboard loads.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSession {
    #[serde(rename = "soz_baseUrl")]
    pub base_url: String,
    #[serde(rename = "soz_apiKey")]
    pub api_key: String,
    #[serde(rename = "soz_entityId")]
    pub entity_id: String,
}

impl DashboardSession {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            entity_id: entity_id.into(),
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.api_key.clone()).with_base_url(self.base_url.clone())
    }

    /// Client for this session, using the default timeout.
    pub fn client(&self) -> LedgerClient {
        LedgerClient::from_config(self.client_config())
    }
}

impl std::fmt::Debug for DashboardSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardSession")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("entity_id", &self.entity_id)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("session store is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Explicit load/save/clear boundary for session storage.
pub trait SessionStore {
    /// `None` when no complete session is stored.
    fn load(&self) -> Result<Option<DashboardSession>, SessionError>;
    fn save(&self, session: &DashboardSession) -> Result<(), SessionError>;
    fn clear(&self) -> Result<(), SessionError>;
}
