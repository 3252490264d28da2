//! Tool-call tracking.
//!
//! Turns each unit of agent work into a promise on the ledger.
//!
//! # Data Flow
//! ```text
//! start(run_id, tool)      → POST promise (category custom) → pending[run_id]
//! succeed(run_id, output)  → pending.remove → output evidence → fulfill
//! fail(run_id, error)      → pending.remove → log evidence    → break
//! ```
//!
//! Unknown run ids are ignored, so a finish callback for a run whose start
//! was never recorded does nothing. The pending entry is removed before the
//! ledger is called; a failed evidence submission is not retried.

use dashmap::DashMap;
use serde_json::{Map, Value};

use crate::client::{Execute, HttpExecutor, LedgerClient, LedgerResult};
use crate::models::{CreatePromise, EvidenceType, Promise, PromiseCategory, SubmitEvidence};

/// Longest output or error text copied into evidence, in characters.
pub const PREVIEW_CHARS: usize = 1000;

/// Records tool calls as promises made by one agent entity.
#[derive(Debug)]
pub struct ToolCallTracker<E = HttpExecutor> {
    client: LedgerClient<E>,
    agent_entity_id: String,
    promisee_entity_id: String,
    pending: DashMap<String, Promise>,
}

impl<E: Execute> ToolCallTracker<E> {
    /// The agent promises to itself unless [`with_promisee`](Self::with_promisee) is used.
    pub fn new(client: LedgerClient<E>, agent_entity_id: impl Into<String>) -> Self {
        let agent_entity_id = agent_entity_id.into();
        Self {
            client,
            promisee_entity_id: agent_entity_id.clone(),
            agent_entity_id,
            pending: DashMap::new(),
        }
    }

    pub fn with_promisee(mut self, promisee_entity_id: impl Into<String>) -> Self {
        self.promisee_entity_id = promisee_entity_id.into();
        self
    }

    pub fn client(&self) -> &LedgerClient<E> {
        &self.client
    }

    /// Number of started runs not yet finished.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Open a promise for `tool` and remember it under `run_id`.
    pub async fn start(&self, run_id: impl Into<String>, tool: &str) -> LedgerResult<Promise> {
        let run_id = run_id.into();
        let promise = self.create(format!("Tool call: {tool}")).await?;

        tracing::debug!(run_id = %run_id, promise_id = %promise.id, tool, "Tool call started");
        self.pending.insert(run_id, promise.clone());
        Ok(promise)
    }

    /// Attach the output and fulfil the run's promise.
    ///
    /// Returns `None` when `run_id` was never started or already finished.
    pub async fn succeed(&self, run_id: &str, output: &str) -> LedgerResult<Option<Promise>> {
        let Some((_, promise)) = self.pending.remove(run_id) else {
            return Ok(None);
        };

        let mut payload = Map::new();
        payload.insert("output_preview".into(), Value::String(preview(output)));
        self.submit(&promise, EvidenceType::Output, payload).await?;

        let fulfilled = self.client.promises().fulfill(&promise.id).await?;
        tracing::debug!(run_id, promise_id = %promise.id, "Tool call fulfilled");
        Ok(Some(fulfilled))
    }

    /// Attach the error and break the run's promise.
    ///
    /// Returns `None` when `run_id` was never started or already finished.
    pub async fn fail(&self, run_id: &str, error: &str) -> LedgerResult<Option<Promise>> {
        let Some((_, promise)) = self.pending.remove(run_id) else {
            return Ok(None);
        };

        let mut payload = Map::new();
        payload.insert("error".into(), Value::String(preview(error)));
        self.submit(&promise, EvidenceType::Log, payload).await?;

        let broken = self.client.promises().break_promise(&promise.id).await?;
        tracing::debug!(run_id, promise_id = %promise.id, "Tool call broken");
        Ok(Some(broken))
    }

    /// Record work that already finished: create, attach output, fulfil.
    ///
    /// For task-level callbacks that only fire on completion.
    pub async fn record_completed(
        &self,
        description: &str,
        agent: &str,
        output: &str,
    ) -> LedgerResult<Promise> {
        let promise = self.create(description.to_string()).await?;

        let mut payload = Map::new();
        payload.insert("agent".into(), Value::String(agent.to_string()));
        payload.insert("output_preview".into(), Value::String(preview(output)));
        self.submit(&promise, EvidenceType::Output, payload).await?;

        self.client.promises().fulfill(&promise.id).await
    }

    async fn create(&self, description: String) -> LedgerResult<Promise> {
        let payload = CreatePromise::new(
            self.agent_entity_id.clone(),
            self.promisee_entity_id.clone(),
            description,
        )
        .with_category(PromiseCategory::Custom);
        self.client.promises().create(&payload).await
    }

    async fn submit(
        &self,
        promise: &Promise,
        evidence_type: EvidenceType,
        payload: Map<String, Value>,
    ) -> LedgerResult<()> {
        let evidence = SubmitEvidence::new(evidence_type, self.agent_entity_id.clone())
            .with_payload(payload);
        self.client.evidence().submit(&promise.id, &evidence).await?;
        Ok(())
    }
}

/// First [`PREVIEW_CHARS`] characters of `text`.
fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_counts_characters() {
        assert_eq!(preview("short"), "short");
        assert_eq!(preview(&"x".repeat(1500)).len(), PREVIEW_CHARS);

        let wide = preview(&"é".repeat(1200));
        assert_eq!(wide.chars().count(), PREVIEW_CHARS);
        assert_eq!(wide.len(), PREVIEW_CHARS * 2);
    }
}
