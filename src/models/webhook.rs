//! Webhook subscriptions and delivery logs.

use serde::{Deserialize, Serialize};

/// Event types a webhook can subscribe to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WebhookEventType {
    #[serde(rename = "promise.created")]
    PromiseCreated,
    #[serde(rename = "promise.fulfilled")]
    PromiseFulfilled,
    #[serde(rename = "promise.broken")]
    PromiseBroken,
    #[serde(rename = "promise.disputed")]
    PromiseDisputed,
    #[serde(rename = "evidence.submitted")]
    EvidenceSubmitted,
    #[serde(rename = "score.updated")]
    ScoreUpdated,
    #[serde(untagged)]
    Other(String),
}

impl WebhookEventType {
    pub fn as_str(&self) -> &str {
        match self {
            WebhookEventType::PromiseCreated => "promise.created",
            WebhookEventType::PromiseFulfilled => "promise.fulfilled",
            WebhookEventType::PromiseBroken => "promise.broken",
            WebhookEventType::PromiseDisputed => "promise.disputed",
            WebhookEventType::EvidenceSubmitted => "evidence.submitted",
            WebhookEventType::ScoreUpdated => "score.updated",
            WebhookEventType::Other(other) => other,
        }
    }
}

impl std::fmt::Display for WebhookEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WebhookEventType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "promise.created" => WebhookEventType::PromiseCreated,
            "promise.fulfilled" => WebhookEventType::PromiseFulfilled,
            "promise.broken" => WebhookEventType::PromiseBroken,
            "promise.disputed" => WebhookEventType::PromiseDisputed,
            "evidence.submitted" => WebhookEventType::EvidenceSubmitted,
            "score.updated" => WebhookEventType::ScoreUpdated,
            other => WebhookEventType::Other(other.to_string()),
        })
    }
}

/// A webhook subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Webhook {
    pub id: String,
    pub entity_id: String,
    pub url: String,
    #[serde(default)]
    pub event_types: Vec<WebhookEventType>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

fn default_active() -> bool {
    true
}

/// Creation response; the signing secret is only disclosed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookWithSecret {
    #[serde(flatten)]
    pub webhook: Webhook,
    pub secret: String,
}

/// Payload for `POST /v1/webhooks`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateWebhook {
    pub url: String,
    pub event_types: Vec<WebhookEventType>,
}

impl CreateWebhook {
    pub fn new(url: impl Into<String>, event_types: Vec<WebhookEventType>) -> Self {
        Self {
            url: url.into(),
            event_types,
        }
    }
}

/// Payload for `PATCH /v1/webhooks/{id}`. Only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateWebhook {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_types: Option<Vec<WebhookEventType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl UpdateWebhook {
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn event_types(mut self, event_types: Vec<WebhookEventType>) -> Self {
        self.event_types = Some(event_types);
        self
    }

    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }
}

/// One delivery attempt in the audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryLog {
    pub id: String,
    pub webhook_id: String,
    pub event_id: String,
    pub event_type: String,
    #[serde(default = "default_attempt")]
    pub attempt_number: u32,
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub response_body: Option<String>,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub next_retry_at: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

fn default_attempt() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_type_wire_names() {
        assert_eq!(
            serde_json::to_value(WebhookEventType::EvidenceSubmitted).unwrap(),
            json!("evidence.submitted")
        );
        let parsed: WebhookEventType = serde_json::from_value(json!("promise.broken")).unwrap();
        assert_eq!(parsed, WebhookEventType::PromiseBroken);
        let other: WebhookEventType = serde_json::from_value(json!("entity.created")).unwrap();
        assert_eq!(other, WebhookEventType::Other("entity.created".into()));
        assert_eq!(
            "score.updated".parse::<WebhookEventType>().unwrap(),
            WebhookEventType::ScoreUpdated
        );
    }

    #[test]
    fn test_create_response_with_secret() {
        let created: WebhookWithSecret = serde_json::from_value(json!({
            "id": "wh_abc123",
            "entity_id": "ent_abc123",
            "url": "https://example.com/webhook",
            "event_types": ["promise.created", "promise.fulfilled"],
            "is_active": true,
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-01T00:00:00Z",
            "secret": "whsec_test_secret_123"
        }))
        .unwrap();
        assert_eq!(created.secret, "whsec_test_secret_123");
        assert_eq!(created.webhook.event_types.len(), 2);
    }

    #[test]
    fn test_update_sends_only_set_fields() {
        let update = UpdateWebhook::default().active(false);
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"is_active": false})
        );
    }

    #[test]
    fn test_delivery_log_defaults() {
        let log: DeliveryLog = serde_json::from_value(json!({
            "id": "dl_1",
            "webhook_id": "wh_1",
            "event_id": "evt_1",
            "event_type": "promise.created",
            "status_code": 200,
            "success": true
        }))
        .unwrap();
        assert_eq!(log.attempt_number, 1);
        assert_eq!(log.status_code, Some(200));
        assert!(log.next_retry_at.is_none());
    }
}
