//! Wire records exchanged with the ledger service.
//!
//! Records returned by the server are decoded leniently: fields the server
//! may omit fall back to documented defaults. Request payloads omit every
//! optional field the caller left unset.

pub mod entity;
pub mod evidence;
pub mod promise;
pub mod score;
pub mod webhook;

pub use entity::{CreateEntity, Entity, EntityType};
pub use evidence::{Evidence, EvidenceType, SubmitEvidence};
pub use promise::{CreatePromise, Promise, PromiseCategory, PromiseStatus};
pub use score::{ScoreHistory, ScoreSnapshot, TrustScore};
pub use webhook::{
    CreateWebhook, DeliveryLog, UpdateWebhook, Webhook, WebhookEventType, WebhookWithSecret,
};
