use crate::client::{ApiRequest, Execute, LedgerResult};
use crate::models::{CreateWebhook, DeliveryLog, UpdateWebhook, Webhook, WebhookWithSecret};

/// `/v1/webhooks`
pub struct Webhooks<'a, E> {
    executor: &'a E,
}

impl<'a, E: Execute> Webhooks<'a, E> {
    pub(crate) fn new(executor: &'a E) -> Self {
        Self { executor }
    }

    /// The returned secret is not retrievable later.
    pub async fn create(&self, payload: &CreateWebhook) -> LedgerResult<WebhookWithSecret> {
        let request = ApiRequest::post("/v1/webhooks", payload)?;
        self.executor.execute(request).await?.json()
    }

    pub async fn list(&self) -> LedgerResult<Vec<Webhook>> {
        self.executor.execute(ApiRequest::get("/v1/webhooks")).await?.json()
    }

    pub async fn get(&self, webhook_id: &str) -> LedgerResult<Webhook> {
        let request = ApiRequest::get(format!("/v1/webhooks/{webhook_id}"));
        self.executor.execute(request).await?.json()
    }

    pub async fn update(&self, webhook_id: &str, payload: &UpdateWebhook) -> LedgerResult<Webhook> {
        let request = ApiRequest::patch(format!("/v1/webhooks/{webhook_id}"), payload)?;
        self.executor.execute(request).await?.json()
    }

    pub async fn delete(&self, webhook_id: &str) -> LedgerResult<()> {
        let request = ApiRequest::delete(format!("/v1/webhooks/{webhook_id}"));
        self.executor.execute(request).await?;
        Ok(())
    }

    /// Delivery attempts for this webhook, as recorded by the server.
    pub async fn logs(&self, webhook_id: &str) -> LedgerResult<Vec<DeliveryLog>> {
        let request = ApiRequest::get(format!("/v1/webhooks/{webhook_id}/logs"));
        self.executor.execute(request).await?.json()
    }
}
