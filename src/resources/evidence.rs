use crate::client::{ApiRequest, Execute, LedgerResult};
use crate::models::{Evidence, SubmitEvidence};

/// `/v1/promises/{id}/evidence`
pub struct EvidenceApi<'a, E> {
    executor: &'a E,
}

impl<'a, E: Execute> EvidenceApi<'a, E> {
    pub(crate) fn new(executor: &'a E) -> Self {
        Self { executor }
    }

    pub async fn submit(&self, promise_id: &str, payload: &SubmitEvidence) -> LedgerResult<Evidence> {
        let request = ApiRequest::post(format!("/v1/promises/{promise_id}/evidence"), payload)?;
        self.executor.execute(request).await?.json()
    }

    pub async fn list(&self, promise_id: &str) -> LedgerResult<Vec<Evidence>> {
        let request = ApiRequest::get(format!("/v1/promises/{promise_id}/evidence"));
        self.executor.execute(request).await?.json()
    }
}
