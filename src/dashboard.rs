//! Dashboard snapshots.
//!
//! One snapshot is one page load: independent reads issued together and
//! joined. The first failure aborts the rest.

use serde::Serialize;

use crate::client::{Execute, LedgerClient, LedgerResult};
use crate::models::{Entity, Evidence, Promise, PromiseStatus, ScoreHistory, TrustScore};

/// Everything the entity overview shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub entity: Entity,
    pub score: TrustScore,
    pub history: ScoreHistory,
    pub promises: Vec<Promise>,
}

impl DashboardSnapshot {
    pub async fn load<E: Execute>(client: &LedgerClient<E>, entity_id: &str) -> LedgerResult<Self> {
        Self::load_filtered(client, entity_id, None).await
    }

    /// Like [`load`](Self::load), with the promise list filtered by status.
    pub async fn load_filtered<E: Execute>(
        client: &LedgerClient<E>,
        entity_id: &str,
        status: Option<PromiseStatus>,
    ) -> LedgerResult<Self> {
        let entities = client.entities();
        let scores = client.scores();

        let (entity, score, history, promises) = tokio::try_join!(
            entities.get(entity_id),
            scores.get(entity_id),
            scores.history(entity_id),
            entities.promises(entity_id, status),
        )?;

        Ok(Self {
            entity,
            score,
            history,
            promises,
        })
    }

    /// Promise counts per status, in lifecycle order, skipping empty ones.
    pub fn status_counts(&self) -> Vec<(PromiseStatus, usize)> {
        [
            PromiseStatus::Active,
            PromiseStatus::Fulfilled,
            PromiseStatus::Broken,
            PromiseStatus::Disputed,
            PromiseStatus::Expired,
        ]
        .into_iter()
        .map(|status| {
            let count = self.promises.iter().filter(|p| p.status == status).count();
            (status, count)
        })
        .filter(|(_, count)| *count > 0)
        .collect()
    }
}

/// A promise with its evidence trail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromiseDetail {
    pub promise: Promise,
    pub evidence: Vec<Evidence>,
}

impl PromiseDetail {
    pub async fn load<E: Execute>(client: &LedgerClient<E>, promise_id: &str) -> LedgerResult<Self> {
        let promises = client.promises();
        let evidence = client.evidence();

        let (promise, evidence) =
            tokio::try_join!(promises.get(promise_id), evidence.list(promise_id))?;

        Ok(Self { promise, evidence })
    }
}
