//! Client root.
//!
//! # Data Flow
//! ```text
//! LedgerClient (owns one Execute impl)
//!     → entities() / promises() / evidence() / scores() / webhooks()
//!         → borrowed façade builds ApiRequest
//!             → Execute::execute (HttpExecutor in production)
//!                 → typed record or LedgerError
//! ```
//!
//! Configuration is fixed at construction; the client holds no mutable
//! state and can be shared across tasks.

pub mod deadline;
pub mod error;
pub mod executor;

pub use deadline::{Deadline, DeadlineElapsed};
pub use error::{ApiErrorBody, ErrorKind, FieldError, LedgerError, LedgerResult};
pub use executor::{ApiRequest, ApiResponse, Execute, Expect, HttpExecutor};

use crate::config::ClientConfig;
use crate::resources::{Entities, EvidenceApi, Promises, Scores, Webhooks};

/// Entry point to the ledger API.
///
/// Generic over the executor so tests can swap the transport without
/// touching the façades.
#[derive(Debug)]
pub struct LedgerClient<E = HttpExecutor> {
    config: ClientConfig,
    executor: E,
}

impl LedgerClient<HttpExecutor> {
    /// Client against the default base URL and timeout.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::from_config(ClientConfig::new(api_key))
    }

    pub fn from_config(config: ClientConfig) -> Self {
        let executor = HttpExecutor::new(&config);
        Self { config, executor }
    }

    /// Use a preconfigured `reqwest::Client` (proxies, TLS roots, pools).
    pub fn with_http_client(config: ClientConfig, http: reqwest::Client) -> Self {
        let executor = HttpExecutor::with_http_client(&config, http);
        Self { config, executor }
    }
}

impl<E: Execute> LedgerClient<E> {
    pub fn with_executor(config: ClientConfig, executor: E) -> Self {
        Self { config, executor }
    }

    pub fn entities(&self) -> Entities<'_, E> {
        Entities::new(&self.executor)
    }

    pub fn promises(&self) -> Promises<'_, E> {
        Promises::new(&self.executor)
    }

    pub fn evidence(&self) -> EvidenceApi<'_, E> {
        EvidenceApi::new(&self.executor)
    }

    pub fn scores(&self) -> Scores<'_, E> {
        Scores::new(&self.executor)
    }

    pub fn webhooks(&self) -> Webhooks<'_, E> {
        Webhooks::new(&self.executor)
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}
