//! Metrics collection and exposition.
//!
//! # Metrics
//! - `ledger_client_requests_total` (counter): calls by method, outcome
//! - `ledger_client_request_duration_seconds` (histogram): call latency by method
//! - `ledger_webhooks_received_total` (counter): deliveries by event type, outcome
//!
//! `outcome` is `success` or the error kind (`timeout`, `network_error`,
//! `http_error`, `decode_error`, `encode_error`). Receiver outcomes are
//! `accepted`, `bad_signature` and `bad_payload`.

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

pub const REQUESTS_TOTAL: &str = "ledger_client_requests_total";
pub const REQUEST_DURATION: &str = "ledger_client_request_duration_seconds";
pub const WEBHOOKS_RECEIVED: &str = "ledger_webhooks_received_total";

/// Record one executor call.
pub fn record_request(method: &str, outcome: &str, elapsed: Duration) {
    ::metrics::counter!(
        REQUESTS_TOTAL,
        "method" => method.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
    ::metrics::histogram!(REQUEST_DURATION, "method" => method.to_string())
        .record(elapsed.as_secs_f64());
}

/// Record one inbound webhook delivery.
pub fn record_webhook_received(event_type: &str, outcome: &str) {
    ::metrics::counter!(
        WEBHOOKS_RECEIVED,
        "event_type" => event_type.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Install the Prometheus recorder and its scrape listener on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}
