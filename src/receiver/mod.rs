//! Webhook receiver subsystem.
//!
//! # Data Flow
//! ```text
//! POST {path} (raw body + X-SozLedger-Signature)
//!     → signature.rs (HMAC-SHA256 check, 401 on failure)
//!     → event.rs (decode WebhookEvent, 400 on failure)
//!     → EventHandler::on_event
//!     → 200
//! ```

pub mod event;
pub mod server;
pub mod signature;

pub use event::{WebhookEvent, WebhookEventType};
pub use server::{router, shutdown_signal, EventHandler, LoggingHandler, WebhookReceiver};
pub use signature::{sign, verify, SignatureError, SIGNATURE_HEADER};
