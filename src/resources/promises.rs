use serde::Serialize;

use crate::client::{ApiRequest, Execute, LedgerResult};
use crate::models::{CreatePromise, Promise, PromiseStatus};

/// Body of the status transition endpoint.
#[derive(Serialize)]
struct StatusTransition {
    status: PromiseStatus,
}

/// `/v1/promises`
///
/// Status changes are exposed as one method per transition so a caller can
/// never send an arbitrary status.
pub struct Promises<'a, E> {
    executor: &'a E,
}

impl<'a, E: Execute> Promises<'a, E> {
    pub(crate) fn new(executor: &'a E) -> Self {
        Self { executor }
    }

    pub async fn create(&self, payload: &CreatePromise) -> LedgerResult<Promise> {
        let request = ApiRequest::post("/v1/promises", payload)?;
        self.executor.execute(request).await?.json()
    }

    pub async fn get(&self, promise_id: &str) -> LedgerResult<Promise> {
        let request = ApiRequest::get(format!("/v1/promises/{promise_id}"));
        self.executor.execute(request).await?.json()
    }

    pub async fn fulfill(&self, promise_id: &str) -> LedgerResult<Promise> {
        self.transition(promise_id, PromiseStatus::Fulfilled).await
    }

    /// Mark the promise broken. (`break` is a keyword.)
    pub async fn break_promise(&self, promise_id: &str) -> LedgerResult<Promise> {
        self.transition(promise_id, PromiseStatus::Broken).await
    }

    pub async fn dispute(&self, promise_id: &str) -> LedgerResult<Promise> {
        self.transition(promise_id, PromiseStatus::Disputed).await
    }

    async fn transition(&self, promise_id: &str, status: PromiseStatus) -> LedgerResult<Promise> {
        let request = ApiRequest::patch(
            format!("/v1/promises/{promise_id}/status"),
            &StatusTransition { status },
        )?;
        self.executor.execute(request).await?.json()
    }
}
