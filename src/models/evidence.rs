//! Evidence records and submission payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind of artifact attached to a promise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceType {
    ApiCallback,
    Webhook,
    Manual,
    File,
    Link,
    /// Output of a tracked tool call.
    Output,
    /// Error report of a failed tool call.
    Log,
    #[serde(untagged)]
    Other(String),
}

/// Immutable proof submitted for a promise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub id: String,
    pub promise_id: String,
    #[serde(rename = "type")]
    pub evidence_type: EvidenceType,
    pub submitted_by: String,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub payload: Option<Map<String, Value>>,
    #[serde(default)]
    pub created_at: String,
    /// Content hash computed by the server.
    #[serde(default)]
    pub hash: String,
}

/// Payload for `POST /v1/promises/{id}/evidence`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitEvidence {
    #[serde(rename = "type")]
    pub evidence_type: EvidenceType,
    pub submitted_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Map<String, Value>>,
}

impl SubmitEvidence {
    pub fn new(evidence_type: EvidenceType, submitted_by: impl Into<String>) -> Self {
        Self {
            evidence_type,
            submitted_by: submitted_by.into(),
            payload: None,
        }
    }

    pub fn with_payload(mut self, payload: Map<String, Value>) -> Self {
        self.payload = Some(payload);
        self
    }
}
