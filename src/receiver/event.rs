//! Inbound webhook events.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{Evidence, Promise, TrustScore};

pub use crate::models::WebhookEventType;

/// One delivery: `{id?, type, data, created_at?}`.
///
/// `data` carries the affected record under `promise`, `evidence` or
/// `score` depending on the event type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type", default = "unknown_type")]
    pub event_type: WebhookEventType,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub created_at: Option<String>,
}

fn unknown_type() -> WebhookEventType {
    WebhookEventType::Other("unknown".to_string())
}

impl WebhookEvent {
    /// `data.promise`, if present.
    pub fn promise(&self) -> Option<serde_json::Result<Promise>> {
        self.record("promise")
    }

    /// `data.evidence`, if present.
    pub fn evidence(&self) -> Option<serde_json::Result<Evidence>> {
        self.record("evidence")
    }

    /// `data.score`, if present.
    pub fn score(&self) -> Option<serde_json::Result<TrustScore>> {
        self.record("score")
    }

    fn record<T: DeserializeOwned>(&self, key: &str) -> Option<serde_json::Result<T>> {
        self.data
            .get(key)
            .filter(|value| !value.is_null())
            .map(|value| T::deserialize(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PromiseStatus;
    use serde_json::json;

    #[test]
    fn test_promise_event() {
        let event: WebhookEvent = serde_json::from_value(json!({
            "id": "evt_1",
            "type": "promise.fulfilled",
            "data": {"promise": {
                "id": "prm_1",
                "promisor_id": "a",
                "promisee_id": "b",
                "description": "d",
                "status": "fulfilled",
                "fulfilled_at": "2025-01-02T00:00:00Z"
            }},
            "created_at": "2025-01-02T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(event.event_type, WebhookEventType::PromiseFulfilled);
        let promise = event.promise().unwrap().unwrap();
        assert_eq!(promise.status, PromiseStatus::Fulfilled);
        assert!(event.evidence().is_none());
    }

    #[test]
    fn test_missing_type_and_data() {
        let event: WebhookEvent = serde_json::from_value(json!({})).unwrap();
        assert_eq!(event.event_type, WebhookEventType::Other("unknown".into()));
        assert!(event.promise().is_none());
        assert!(event.score().is_none());
    }

    #[test]
    fn test_malformed_record_surfaces_error() {
        let event: WebhookEvent = serde_json::from_value(json!({
            "type": "score.updated",
            "data": {"score": {"overall_score": 0.5}}
        }))
        .unwrap();
        assert!(event.score().unwrap().is_err());
    }
}
