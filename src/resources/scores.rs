use crate::client::{ApiRequest, Execute, LedgerResult};
use crate::models::{ScoreHistory, TrustScore};

/// `/v1/scores`
pub struct Scores<'a, E> {
    executor: &'a E,
}

impl<'a, E: Execute> Scores<'a, E> {
    pub(crate) fn new(executor: &'a E) -> Self {
        Self { executor }
    }

    pub async fn get(&self, entity_id: &str) -> LedgerResult<TrustScore> {
        let request = ApiRequest::get(format!("/v1/scores/{entity_id}"));
        self.executor.execute(request).await?.json()
    }

    /// Snapshots in server order; see [`ScoreHistory::chronological`].
    pub async fn history(&self, entity_id: &str) -> LedgerResult<ScoreHistory> {
        let request = ApiRequest::get(format!("/v1/scores/{entity_id}/history"));
        self.executor.execute(request).await?.json()
    }
}
