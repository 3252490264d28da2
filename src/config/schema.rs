//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files and
//! carry a default for every field, so an empty file is a valid config.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default ledger API endpoint.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default per-call timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct LedgerConfig {
    /// API client settings.
    pub client: ClientConfig,

    /// Webhook receiver settings.
    pub receiver: ReceiverConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

/// Settings for one `LedgerClient`. Read-only once the client is built.
#[derive(Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Bearer token sent on every call.
    pub api_key: String,

    /// Service root, e.g. "https://ledger.example.com". Trailing slashes are ignored.
    pub base_url: String,

    /// Per-call timeout in milliseconds.
    pub timeout_ms: u64,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

/// Inbound webhook endpoint configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReceiverConfig {
    /// Bind address (e.g., "0.0.0.0:5000").
    pub bind_address: String,

    /// Route that accepts deliveries.
    pub path: String,

    /// Signing secret issued when the webhook was created.
    pub secret: String,

    /// Maximum accepted delivery size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
            path: "/webhooks".to_string(),
            secret: String::new(),
            max_body_bytes: 1024 * 1024, // 1MB
        }
    }
}

impl fmt::Debug for ReceiverConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReceiverConfig")
            .field("bind_address", &self.bind_address)
            .field("path", &self.path)
            .field("secret", &redact(&self.secret))
            .field("max_body_bytes", &self.max_body_bytes)
            .finish()
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}
