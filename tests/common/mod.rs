//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use soz_ledger::client::{ApiRequest, ApiResponse, Execute, LedgerResult};
use soz_ledger::{ClientConfig, LedgerClient};

pub const API_KEY: &str = "sk_test_key";

/// One request as the mock ledger saw it.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Captured {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

type Responder = dyn Fn(&Captured) -> (u16, String) + Send + Sync;

#[derive(Clone)]
struct MockState {
    requests: Arc<Mutex<Vec<Captured>>>,
    respond: Arc<Responder>,
}

/// Handle to a running mock ledger.
pub struct MockLedger {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<Captured>>>,
}

impl MockLedger {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<Captured> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last(&self) -> Captured {
        self.requests().pop().expect("mock ledger saw no requests")
    }
}

/// Start a programmable mock ledger on an ephemeral port.
///
/// Every request is captured; `respond` picks the status and raw body.
pub async fn start_mock_ledger<F>(respond: F) -> MockLedger
where
    F: Fn(&Captured) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));

    let state = MockState {
        requests: requests.clone(),
        respond: Arc::new(respond),
    };
    let app = Router::new().fallback(capture).with_state(state);

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockLedger { addr, requests }
}

/// Mock ledger that always answers with `status` and `body`.
pub async fn start_fixed_ledger(status: u16, body: Value) -> MockLedger {
    let body = if body.is_null() {
        String::new()
    } else {
        body.to_string()
    };
    start_mock_ledger(move |_| (status, body.clone())).await
}

async fn capture(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let captured = Captured {
        method,
        uri,
        headers,
        body,
    };
    let (status, body) = (state.respond)(&captured);
    state.requests.lock().unwrap().push(captured);

    let status = StatusCode::from_u16(status).unwrap();
    if body.is_empty() {
        return status.into_response();
    }
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

/// Backend that accepts connections and never answers.
pub async fn start_silent_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    addr
}

/// Backend that answers every request with `head` and then `body`, and
/// closes the connection.
///
/// With a `content-length` larger than `body`, the client sees a response
/// whose body ends early.
pub async fn start_raw_backend(head: &'static str, body: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = vec![0u8; 8192];
                let mut seen = Vec::new();
                while !seen.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => seen.extend_from_slice(&buf[..n]),
                    }
                }
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.write_all(body.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// An address nothing is listening on.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Real HTTP client against `base_url`, bypassing any system proxy.
pub fn http_client(base_url: &str, timeout: Duration) -> LedgerClient {
    let config = ClientConfig::new(API_KEY)
        .with_base_url(base_url)
        .with_timeout(timeout);
    let http = reqwest::Client::builder().no_proxy().build().unwrap();
    LedgerClient::with_http_client(config, http)
}

/// One call seen by [`RecordingExecutor`].
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: String,
    pub path: String,
    pub body: Option<Value>,
}

type Route = dyn Fn(&ApiRequest) -> LedgerResult<ApiResponse> + Send + Sync;

/// In-process executor that records calls and answers from a closure.
pub struct RecordingExecutor {
    calls: Mutex<Vec<Call>>,
    route: Box<Route>,
    delay: Option<Duration>,
}

impl RecordingExecutor {
    pub fn new<F>(route: F) -> Self
    where
        F: Fn(&ApiRequest) -> LedgerResult<ApiResponse> + Send + Sync + 'static,
    {
        Self {
            calls: Mutex::new(Vec::new()),
            route: Box::new(route),
            delay: None,
        }
    }

    /// Sleep this long before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last(&self) -> Call {
        self.calls().pop().expect("no calls recorded")
    }
}

impl Execute for RecordingExecutor {
    async fn execute(&self, request: ApiRequest) -> LedgerResult<ApiResponse> {
        self.calls.lock().unwrap().push(Call {
            method: request.method().to_string(),
            path: request.path().to_string(),
            body: request.json_body(),
        });
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.route)(&request)
    }
}

pub fn ok(body: Value) -> LedgerResult<ApiResponse> {
    Ok(ApiResponse::new(StatusCode::OK, body))
}

pub fn recording_client<F>(route: F) -> LedgerClient<RecordingExecutor>
where
    F: Fn(&ApiRequest) -> LedgerResult<ApiResponse> + Send + Sync + 'static,
{
    LedgerClient::with_executor(ClientConfig::new(API_KEY), RecordingExecutor::new(route))
}

pub fn entity_fixture() -> Value {
    json!({
        "id": "ent_abc123",
        "name": "test-agent",
        "type": "agent",
        "public_key": null,
        "api_key": "sk_test_key",
        "created_at": "2025-01-01T00:00:00Z",
        "metadata": null
    })
}

pub fn promise_fixture(status: &str) -> Value {
    json!({
        "id": "prm_abc123",
        "promisor_id": "ent_abc123",
        "promisee_id": "ent_def456",
        "description": "Will deliver report",
        "category": "delivery",
        "status": status,
        "deadline": "2025-06-01T00:00:00Z",
        "created_at": "2025-01-01T00:00:00Z",
        "fulfilled_at": null
    })
}

pub fn evidence_fixture() -> Value {
    json!({
        "id": "ev_abc123",
        "promise_id": "prm_abc123",
        "type": "api_callback",
        "submitted_by": "ent_abc123",
        "verified": false,
        "payload": {"note": "Delivered via email"},
        "created_at": "2025-01-02T00:00:00Z",
        "hash": "sha256_abc"
    })
}

pub fn score_fixture() -> Value {
    json!({
        "entity_id": "ent_abc123",
        "entity_name": "test-agent",
        "overall_score": 85.5,
        "level": "Reliable",
        "rated": true,
        "total_promises": 10,
        "fulfilled_count": 8,
        "broken_count": 1,
        "avg_delay_hours": 2.5,
        "category_scores": {"delivery": 90.0},
        "streak": 3,
        "score_version": "v1",
        "last_updated": "2025-01-03T00:00:00Z"
    })
}

pub fn history_fixture() -> Value {
    json!({
        "entity_id": "ent_abc123",
        "history": [
            {"score": 85.5, "level": "Reliable", "timestamp": "2025-01-03T00:00:00Z", "version": "v1"},
            {"score": 80.0, "level": "Reliable", "timestamp": "2025-01-02T00:00:00Z", "version": "v1"}
        ]
    })
}

pub fn webhook_fixture() -> Value {
    json!({
        "id": "wh_abc123",
        "entity_id": "ent_abc123",
        "url": "https://example.com/webhook",
        "event_types": ["promise.created", "promise.fulfilled"],
        "is_active": true,
        "created_at": "2025-01-01T00:00:00Z",
        "updated_at": "2025-01-01T00:00:00Z"
    })
}
