use crate::client::{ApiRequest, Execute, LedgerResult};
use crate::models::{CreateEntity, Entity, Promise, PromiseStatus, TrustScore};

/// `/v1/entities`
pub struct Entities<'a, E> {
    executor: &'a E,
}

impl<'a, E: Execute> Entities<'a, E> {
    pub(crate) fn new(executor: &'a E) -> Self {
        Self { executor }
    }

    /// Register an entity. The response carries its API key.
    pub async fn create(&self, payload: &CreateEntity) -> LedgerResult<Entity> {
        let request = ApiRequest::post("/v1/entities", payload)?;
        self.executor.execute(request).await?.json()
    }

    pub async fn get(&self, entity_id: &str) -> LedgerResult<Entity> {
        let request = ApiRequest::get(format!("/v1/entities/{entity_id}"));
        self.executor.execute(request).await?.json()
    }

    /// Entity-scoped alias of the current trust score.
    pub async fn score(&self, entity_id: &str) -> LedgerResult<TrustScore> {
        let request = ApiRequest::get(format!("/v1/entities/{entity_id}/score"));
        self.executor.execute(request).await?.json()
    }

    /// Promises where the entity is either party, optionally filtered by status.
    pub async fn promises(
        &self,
        entity_id: &str,
        status: Option<PromiseStatus>,
    ) -> LedgerResult<Vec<Promise>> {
        let path = match status {
            Some(status) => format!("/v1/entities/{entity_id}/promises?status={status}"),
            None => format!("/v1/entities/{entity_id}/promises"),
        };
        self.executor.execute(ApiRequest::get(path)).await?.json()
    }
}
