//! Promise records and payloads.

use serde::{Deserialize, Serialize};

/// Category a promise belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromiseCategory {
    Delivery,
    Payment,
    Response,
    Uptime,
    Custom,
    #[serde(untagged)]
    Other(String),
}

/// Lifecycle status. Transitions are enforced by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromiseStatus {
    Active,
    Fulfilled,
    Broken,
    Disputed,
    Expired,
}

impl PromiseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromiseStatus::Active => "active",
            PromiseStatus::Fulfilled => "fulfilled",
            PromiseStatus::Broken => "broken",
            PromiseStatus::Disputed => "disputed",
            PromiseStatus::Expired => "expired",
        }
    }
}

impl std::fmt::Display for PromiseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tracked commitment from one entity to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Promise {
    pub id: String,
    pub promisor_id: String,
    pub promisee_id: String,
    pub description: String,
    #[serde(default = "default_category")]
    pub category: PromiseCategory,
    #[serde(default = "default_status")]
    pub status: PromiseStatus,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub fulfilled_at: Option<String>,
}

fn default_category() -> PromiseCategory {
    PromiseCategory::Custom
}

fn default_status() -> PromiseStatus {
    PromiseStatus::Active
}

impl Promise {
    /// The other party from `entity_id`'s point of view.
    pub fn counterparty(&self, entity_id: &str) -> &str {
        if self.promisor_id == entity_id {
            &self.promisee_id
        } else {
            &self.promisor_id
        }
    }
}

/// Payload for `POST /v1/promises`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatePromise {
    pub promisor_id: String,
    pub promisee_id: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<PromiseCategory>,
    /// ISO-8601 timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
}

impl CreatePromise {
    pub fn new(
        promisor_id: impl Into<String>,
        promisee_id: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            promisor_id: promisor_id.into(),
            promisee_id: promisee_id.into(),
            description: description.into(),
            category: None,
            deadline: None,
        }
    }

    pub fn with_category(mut self, category: PromiseCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_deadline(mut self, deadline: impl Into<String>) -> Self {
        self.deadline = Some(deadline.into());
        self
    }
}
