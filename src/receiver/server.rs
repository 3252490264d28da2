//! Webhook receiver server.
//!
//! # Responsibilities
//! - Accept signed deliveries on a single POST route
//! - Reject bad signatures (401) before looking at the payload
//! - Reject payloads that are not JSON events (400)
//! - Dispatch accepted events to an [`EventHandler`] and answer 200
//!
//! The receiver never calls back into the ledger and never retries.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::config::ReceiverConfig;
use crate::observability::metrics;
use crate::receiver::event::{WebhookEvent, WebhookEventType};
use crate::receiver::signature::{self, SIGNATURE_HEADER};

/// Reacts to accepted deliveries. Runs inline before the 200 is sent, so
/// implementations should hand long work off to a task.
pub trait EventHandler: Send + Sync + 'static {
    fn on_event(&self, event: &WebhookEvent);
}

/// Logs every event with its salient fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingHandler;

impl EventHandler for LoggingHandler {
    fn on_event(&self, event: &WebhookEvent) {
        match &event.event_type {
            WebhookEventType::PromiseCreated
            | WebhookEventType::PromiseFulfilled
            | WebhookEventType::PromiseBroken
            | WebhookEventType::PromiseDisputed => match event.promise() {
                Some(Ok(promise)) => tracing::info!(
                    event_type = %event.event_type,
                    promise_id = %promise.id,
                    promisor = %promise.promisor_id,
                    promisee = %promise.promisee_id,
                    status = %promise.status,
                    fulfilled_at = ?promise.fulfilled_at,
                    "Promise event"
                ),
                Some(Err(e)) => {
                    tracing::warn!(event_type = %event.event_type, error = %e, "Unreadable promise in event")
                }
                None => tracing::warn!(event_type = %event.event_type, "Event has no promise"),
            },
            WebhookEventType::EvidenceSubmitted => match event.evidence() {
                Some(Ok(evidence)) => tracing::info!(
                    evidence_id = %evidence.id,
                    promise_id = %evidence.promise_id,
                    evidence_type = ?evidence.evidence_type,
                    verified = evidence.verified,
                    "Evidence submitted"
                ),
                Some(Err(e)) => tracing::warn!(error = %e, "Unreadable evidence in event"),
                None => tracing::warn!("Event has no evidence"),
            },
            WebhookEventType::ScoreUpdated => match event.score() {
                Some(Ok(score)) => tracing::info!(
                    entity_id = %score.entity_id,
                    overall_score = ?score.overall_score,
                    level = %score.level,
                    "Score updated"
                ),
                Some(Err(e)) => tracing::warn!(error = %e, "Unreadable score in event"),
                None => tracing::warn!("Event has no score"),
            },
            WebhookEventType::Other(other) => {
                tracing::warn!(event_type = %other, "Unhandled event type")
            }
        }
    }
}

struct ReceiverState<H> {
    secret: Arc<str>,
    handler: Arc<H>,
}

impl<H> Clone for ReceiverState<H> {
    fn clone(&self) -> Self {
        Self {
            secret: self.secret.clone(),
            handler: self.handler.clone(),
        }
    }
}

/// Build the receiver router: one POST route at `config.path`.
pub fn router<H: EventHandler>(config: &ReceiverConfig, handler: H) -> Router {
    let state = ReceiverState {
        secret: Arc::from(config.secret.as_str()),
        handler: Arc::new(handler),
    };

    Router::new()
        .route(&config.path, post(receive::<H>))
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
}

async fn receive<H: EventHandler>(
    State(state): State<ReceiverState<H>>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let header = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    if let Err(e) = signature::verify(&state.secret, &body, header) {
        tracing::warn!(error = %e, "Invalid webhook signature, rejecting delivery");
        metrics::record_webhook_received("unknown", "bad_signature");
        return StatusCode::UNAUTHORIZED;
    }

    let event: WebhookEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            tracing::error!(error = %e, "Malformed JSON in webhook body");
            metrics::record_webhook_received("unknown", "bad_payload");
            return StatusCode::BAD_REQUEST;
        }
    };

    tracing::info!(
        event_type = %event.event_type,
        event_id = ?event.id,
        "Received webhook event"
    );
    state.handler.on_event(&event);
    metrics::record_webhook_received(event.event_type.as_str(), "accepted");

    StatusCode::OK
}

/// Serves a receiver router until `shutdown` resolves.
pub struct WebhookReceiver {
    router: Router,
}

impl WebhookReceiver {
    pub fn new<H: EventHandler>(config: &ReceiverConfig, handler: H) -> Self {
        Self {
            router: router(config, handler),
        }
    }

    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Webhook receiver starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Webhook receiver stopped");
        Ok(())
    }
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
