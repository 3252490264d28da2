//! Soz Ledger client library.
//!
//! Typed access to the soz ledger trust-scoring service: entities, promises,
//! evidence, trust scores and webhooks.
//!
//! # Architecture Overview
//!
//! ```text
//!     caller
//!       │
//!       ▼
//!  ┌──────────────┐   entities() promises() evidence() scores() webhooks()
//!  │ LedgerClient │──────────────────────────────┐
//!  └──────────────┘                              ▼
//!                                       ┌─────────────────┐
//!                                       │ resource façade │ (method + path)
//!                                       └────────┬────────┘
//!                                                ▼
//!                                       ┌─────────────────┐      ┌────────────┐
//!                                       │  HttpExecutor   │─────▶│ ledger API │
//!                                       │ deadline + auth │◀─────│   /v1/...  │
//!                                       └─────────────────┘      └────────────┘
//!
//!  Around the core: config (TOML + env), observability (tracing + metrics),
//!  receiver (signed webhook endpoint), session + dashboard (consumer helpers),
//!  tracker (tool calls recorded as promises).
//! ```
//!
//! ```no_run
//! use soz_ledger::{CreateEntity, EntityType, LedgerClient};
//!
//! # async fn run() -> Result<(), soz_ledger::LedgerError> {
//! let client = LedgerClient::new("sk_live_...");
//! let agent = client
//!     .entities()
//!     .create(&CreateEntity::new("billing-agent", EntityType::Agent))
//!     .await?;
//! let score = client.scores().get(&agent.id).await?;
//! println!("{} is {}", agent.name, score.level);
//! # Ok(())
//! # }
//! ```

// Client core
pub mod client;
pub mod models;
pub mod resources;

// Cross-cutting concerns
pub mod config;
pub mod observability;

// Consumers of the core
pub mod dashboard;
pub mod receiver;
pub mod session;
pub mod tracker;

pub use client::{ErrorKind, Execute, HttpExecutor, LedgerClient, LedgerError, LedgerResult};
pub use config::{ClientConfig, LedgerConfig};
pub use dashboard::{DashboardSnapshot, PromiseDetail};
pub use models::*;
pub use receiver::{EventHandler, WebhookEvent, WebhookReceiver};
pub use session::{DashboardSession, SessionStore};
pub use tracker::ToolCallTracker;
