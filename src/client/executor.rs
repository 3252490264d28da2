//! Request execution.
//!
//! # Data Flow
//! ```text
//! ApiRequest (method, path, serialized body?, expectation)
//!     → join base URL + path
//!     → attach Authorization / Content-Type / X-Request-ID
//!     → Deadline::guard(send + read body)
//!     → 2xx: decode JSON (or skip for no-content)
//!     → otherwise: LedgerError (timeout / network / http / decode)
//! ```
//!
//! # Design Decisions
//! - No retries and no backoff; every failure surfaces once
//! - Only POST and PATCH requests can carry a body
//! - The body is serialized once, when the request is built, and sent as-is

use std::future::Future;
use std::time::{Duration, Instant};

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::client::deadline::Deadline;
use crate::client::error::{LedgerError, LedgerResult};
use crate::config::ClientConfig;
use crate::observability::metrics;

/// Correlation header attached to every outgoing call.
pub const X_REQUEST_ID: &str = "x-request-id";

/// What the caller expects back from a successful call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    /// Decode the body as JSON.
    Json,
    /// Ignore the body entirely.
    NoContent,
}

/// One API call, fully described before it is issued.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: Method,
    path: String,
    body: Option<Vec<u8>>,
    expect: Expect,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            body: None,
            expect: Expect::Json,
        }
    }

    /// DELETE expects no content back.
    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::DELETE,
            path: path.into(),
            body: None,
            expect: Expect::NoContent,
        }
    }

    pub fn post<B>(path: impl Into<String>, body: &B) -> LedgerResult<Self>
    where
        B: Serialize + ?Sized,
    {
        Self::with_body(Method::POST, path.into(), body)
    }

    pub fn patch<B>(path: impl Into<String>, body: &B) -> LedgerResult<Self>
    where
        B: Serialize + ?Sized,
    {
        Self::with_body(Method::PATCH, path.into(), body)
    }

    fn with_body<B>(method: Method, path: String, body: &B) -> LedgerResult<Self>
    where
        B: Serialize + ?Sized,
    {
        let bytes = serde_json::to_vec(body).map_err(LedgerError::encode)?;
        Ok(Self {
            method,
            path,
            body: Some(bytes),
            expect: Expect::Json,
        })
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Exact bytes that go on the wire, if any.
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Body parsed back into a JSON value. Mostly useful in tests.
    pub fn json_body(&self) -> Option<Value> {
        self.body
            .as_deref()
            .and_then(|b| serde_json::from_slice(b).ok())
    }

    pub fn expect(&self) -> Expect {
        self.expect
    }
}

/// Successful response: status plus decoded body (`Null` for no-content calls).
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: Value) -> Self {
        Self { status, body }
    }

    pub fn empty(status: StatusCode) -> Self {
        Self {
            status,
            body: Value::Null,
        }
    }

    /// Decode the body into a typed record.
    pub fn json<T: DeserializeOwned>(self) -> LedgerResult<T> {
        let status = self.status.as_u16();
        serde_json::from_value(self.body).map_err(|e| LedgerError::decode(status, e))
    }
}

/// The seam between façades and the transport.
///
/// Implementations must raise only [`LedgerError`] and must not retry.
pub trait Execute: Send + Sync {
    fn execute(&self, request: ApiRequest) -> impl Future<Output = LedgerResult<ApiResponse>> + Send;
}

/// Join a base URL and an absolute path, dropping any trailing slashes on the base.
pub fn join_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// `reqwest`-backed executor.
#[derive(Clone)]
pub struct HttpExecutor {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl HttpExecutor {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_http_client(config, reqwest::Client::new())
    }

    /// Use a caller-supplied `reqwest::Client` (proxy settings, TLS roots, ...).
    pub fn with_http_client(config: &ClientConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            timeout: config.timeout(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// URL a request would be sent to.
    pub fn url_for(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    async fn exchange(
        &self,
        request: ApiRequest,
        request_id: Uuid,
    ) -> LedgerResult<ApiResponse> {
        let ApiRequest {
            method,
            path,
            body,
            expect,
        } = request;

        let mut builder = self
            .http
            .request(method, self.url_for(&path))
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(X_REQUEST_ID, request_id.to_string());

        if let Some(bytes) = body {
            builder = builder.header(CONTENT_TYPE, "application/json").body(bytes);
        }

        let response = builder.send().await.map_err(LedgerError::from_transport)?;
        let status = response.status();
        let bytes = response.bytes().await;

        if !status.is_success() {
            // A body that cannot be read is treated like one that cannot be decoded.
            let body = bytes
                .ok()
                .and_then(|b| serde_json::from_slice::<Value>(&b).ok());
            return Err(LedgerError::from_response(status.as_u16(), body));
        }
        let bytes = bytes.map_err(LedgerError::from_transport)?;

        match expect {
            Expect::NoContent => Ok(ApiResponse::empty(status)),
            Expect::Json => serde_json::from_slice::<Value>(&bytes)
                .map(|body| ApiResponse::new(status, body))
                .map_err(|e| LedgerError::decode(status.as_u16(), e)),
        }
    }
}

impl Execute for HttpExecutor {
    async fn execute(&self, request: ApiRequest) -> LedgerResult<ApiResponse> {
        let method = request.method().clone();
        let path = request.path().to_string();
        let request_id = Uuid::new_v4();
        let started = Instant::now();

        tracing::debug!(
            method = %method,
            path = %path,
            request_id = %request_id,
            "Issuing ledger request"
        );

        let deadline = Deadline::after(self.timeout);
        let result = match deadline.guard(self.exchange(request, request_id)).await {
            Ok(result) => result,
            Err(elapsed) => Err(LedgerError::timed_out_after(elapsed.window)),
        };

        let elapsed = started.elapsed();
        match &result {
            Ok(response) => {
                metrics::record_request(method.as_str(), "success", elapsed);
                tracing::debug!(
                    method = %method,
                    path = %path,
                    request_id = %request_id,
                    status = response.status.as_u16(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Ledger request completed"
                );
            }
            Err(e) => {
                metrics::record_request(method.as_str(), e.kind().as_str(), elapsed);
                tracing::warn!(
                    method = %method,
                    path = %path,
                    request_id = %request_id,
                    kind = %e.kind(),
                    status = e.status(),
                    code = e.code().unwrap_or("-"),
                    error = %e,
                    "Ledger request failed"
                );
            }
        }

        result
    }
}

impl std::fmt::Debug for HttpExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpExecutor")
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout.as_millis())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_join_url_strips_trailing_slashes() {
        assert_eq!(
            join_url("https://api.example.com///", "/v1/entities/e1"),
            "https://api.example.com/v1/entities/e1"
        );
        assert_eq!(
            join_url("http://localhost:8000", "/v1/scores/e1"),
            "http://localhost:8000/v1/scores/e1"
        );
    }

    #[test]
    fn test_get_and_delete_have_no_body() {
        let get = ApiRequest::get("/v1/entities/e1");
        assert_eq!(get.method(), &Method::GET);
        assert!(get.body().is_none());
        assert_eq!(get.expect(), Expect::Json);

        let delete = ApiRequest::delete("/v1/webhooks/w1");
        assert_eq!(delete.method(), &Method::DELETE);
        assert!(delete.body().is_none());
        assert_eq!(delete.expect(), Expect::NoContent);
    }

    #[test]
    fn test_post_body_is_exact_serialization() {
        #[derive(Serialize)]
        struct Payload<'a> {
            name: &'a str,
            #[serde(rename = "type")]
            kind: &'a str,
        }

        let req = ApiRequest::post(
            "/v1/entities",
            &Payload {
                name: "a",
                kind: "agent",
            },
        )
        .unwrap();
        assert_eq!(req.method(), &Method::POST);
        assert_eq!(req.body(), Some(br#"{"name":"a","type":"agent"}"#.as_slice()));
        assert_eq!(req.json_body(), Some(json!({"name": "a", "type": "agent"})));
    }

    #[test]
    fn test_encode_failure_is_normalized() {
        use std::collections::BTreeMap;

        // Non-string map keys cannot become JSON object keys.
        let mut bad = BTreeMap::new();
        bad.insert((1, 2), "x");
        let err = ApiRequest::post("/v1/entities", &bad).unwrap_err();
        assert_eq!(err.status(), 0);
        assert_eq!(err.code(), Some("encode_error"));
    }

    #[test]
    fn test_response_typed_decode() {
        #[derive(Debug, serde::Deserialize)]
        struct Rec {
            id: String,
        }

        let ok = ApiResponse::new(StatusCode::OK, json!({"id": "e1"}));
        assert_eq!(ok.json::<Rec>().unwrap().id, "e1");

        let bad = ApiResponse::new(StatusCode::CREATED, json!({"nope": true}));
        let err = bad.json::<Rec>().unwrap_err();
        assert_eq!(err.status(), 201);
        assert_eq!(err.code(), Some("decode_error"));
    }

    #[test]
    fn test_executor_normalizes_base_url() {
        let config = ClientConfig::new("k").with_base_url("https://api.example.com///");
        let exec = HttpExecutor::new(&config);
        assert_eq!(exec.base_url(), "https://api.example.com");
        assert_eq!(
            exec.url_for("/v1/entities/e1"),
            "https://api.example.com/v1/entities/e1"
        );
    }

    #[test]
    fn test_debug_omits_api_key() {
        let config = ClientConfig::new("sk_secret");
        let exec = HttpExecutor::new(&config);
        assert!(!format!("{exec:?}").contains("sk_secret"));
    }
}
