//! Error normalization for every ledger call.
//!
//! # Responsibilities
//! - Collapse timeouts, transport failures, API errors and decode failures
//!   into a single [`LedgerError`]
//! - Derive the human-readable message once, at construction
//! - Keep the raw error body untyped; callers branch on field presence
//!
//! # Message Precedence
//! ```text
//! body.message → body.error → body.code → body.detail → "HTTP {status}"
//! ```
//! Only fields that are present and are JSON strings take part.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Fixed code carried by deadline failures.
pub const TIMEOUT_CODE: &str = "timeout";
/// Fixed code carried by transport failures that are not timeouts.
pub const NETWORK_ERROR_CODE: &str = "network_error";
/// Fixed code for a success response whose body could not be decoded.
pub const DECODE_ERROR_CODE: &str = "decode_error";
/// Fixed code for a request payload that could not be serialized.
pub const ENCODE_ERROR_CODE: &str = "encode_error";

/// Failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No response before the deadline. Status is always 0.
    Timeout,
    /// The transport failed before a response was obtained. Status is always 0.
    Network,
    /// The server answered with a non-2xx status.
    Http,
    /// The server answered 2xx but the body was not the expected JSON.
    Decode,
    /// The request payload could not be serialized. Status is always 0.
    Encode,
}

impl ErrorKind {
    /// Stable label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Timeout => "timeout",
            ErrorKind::Network => "network_error",
            ErrorKind::Http => "http_error",
            ErrorKind::Decode => "decode_error",
            ErrorKind::Encode => "encode_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The one error type raised by the client.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct LedgerError {
    kind: ErrorKind,
    status: u16,
    code: Option<String>,
    body: Option<Value>,
    message: String,
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

impl LedgerError {
    /// The deadline elapsed before a response arrived.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Timeout,
            status: 0,
            code: Some(TIMEOUT_CODE.to_string()),
            body: None,
            message: message.into(),
        }
    }

    /// Timeout with the standard message for a given window.
    pub fn timed_out_after(window: Duration) -> Self {
        Self::timeout(format!("Request timed out after {}ms", window.as_millis()))
    }

    /// The transport failed; `message` is the underlying failure's text.
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Network,
            status: 0,
            code: Some(NETWORK_ERROR_CODE.to_string()),
            body: None,
            message: message.into(),
        }
    }

    /// Non-2xx response. `body` is whatever the best-effort JSON decode produced.
    pub fn from_response(status: u16, body: Option<Value>) -> Self {
        let code = body
            .as_ref()
            .and_then(|b| string_field(b, "error").or_else(|| string_field(b, "code")))
            .map(str::to_string);

        let message = body
            .as_ref()
            .and_then(|b| {
                string_field(b, "message")
                    .or_else(|| string_field(b, "error"))
                    .or_else(|| string_field(b, "code"))
                    .or_else(|| string_field(b, "detail"))
            })
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {status}"));

        Self {
            kind: ErrorKind::Http,
            status,
            code,
            body,
            message,
        }
    }

    /// A success response whose body could not be decoded.
    pub fn decode(status: u16, err: serde_json::Error) -> Self {
        Self {
            kind: ErrorKind::Decode,
            status,
            code: Some(DECODE_ERROR_CODE.to_string()),
            body: None,
            message: format!("Failed to decode response body: {err}"),
        }
    }

    /// The request payload could not be serialized.
    pub fn encode(err: serde_json::Error) -> Self {
        Self {
            kind: ErrorKind::Encode,
            status: 0,
            code: Some(ENCODE_ERROR_CODE.to_string()),
            body: None,
            message: format!("Failed to encode request body: {err}"),
        }
    }

    /// Classify a `reqwest` failure that happened before a response was read.
    ///
    /// The message is the innermost cause (refused connection, failed DNS
    /// lookup), not reqwest's "error sending request" wrapper.
    pub fn from_transport(err: reqwest::Error) -> Self {
        let message = root_cause(&err);
        if err.is_timeout() {
            Self::timeout(message)
        } else {
            Self::network(message)
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// HTTP status, or 0 when no server response was obtained.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Machine-readable code, when one is known.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Raw decoded error body, when the server sent JSON.
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == ErrorKind::Timeout
    }

    pub fn is_network(&self) -> bool {
        self.kind == ErrorKind::Network
    }

    /// True when the server never produced a response.
    pub fn is_transport(&self) -> bool {
        self.status == 0
    }

    /// Typed view of the documented error body shape.
    ///
    /// Returns `None` when there is no body or it does not match the shape.
    pub fn api_body(&self) -> Option<ApiErrorBody> {
        self.body
            .as_ref()
            .and_then(|b| serde_json::from_value(b.clone()).ok())
    }
}

fn root_cause(err: &(dyn std::error::Error + 'static)) -> String {
    let mut cause = err;
    while let Some(next) = cause.source() {
        cause = next;
    }
    cause.to_string()
}

fn string_field<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get(key).and_then(Value::as_str)
}

/// Documented API error body: `{error, message, details?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<FieldError>,
}

/// One field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_not_found_body() {
        let err = LedgerError::from_response(
            404,
            Some(json!({"error": "not_found", "message": "Entity not found"})),
        );
        assert_eq!(err.kind(), ErrorKind::Http);
        assert_eq!(err.status(), 404);
        assert_eq!(err.code(), Some("not_found"));
        assert_eq!(err.message(), "Entity not found");
        assert_eq!(err.to_string(), "Entity not found");
        assert_eq!(
            err.body(),
            Some(&json!({"error": "not_found", "message": "Entity not found"}))
        );
    }

    #[test]
    fn test_falls_back_to_error_field() {
        let err = LedgerError::from_response(500, Some(json!({"error": "server_error"})));
        assert_eq!(err.message(), "server_error");
        assert_eq!(err.code(), Some("server_error"));
    }

    #[test]
    fn test_code_field_when_error_absent() {
        let err = LedgerError::from_response(409, Some(json!({"code": "conflict"})));
        assert_eq!(err.code(), Some("conflict"));
        assert_eq!(err.message(), "conflict");
    }

    #[test]
    fn test_detail_only_body() {
        let err = LedgerError::from_response(422, Some(json!({"detail": "Invalid status"})));
        assert_eq!(err.message(), "Invalid status");
        assert_eq!(err.code(), None);
    }

    #[test]
    fn test_no_body_synthesizes_message() {
        let err = LedgerError::from_response(502, None);
        assert_eq!(err.message(), "HTTP 502");
        assert_eq!(err.code(), None);
        assert!(err.body().is_none());
        assert!(err.api_body().is_none());
    }

    #[test]
    fn test_non_string_fields_are_ignored() {
        let err = LedgerError::from_response(
            400,
            Some(json!({"message": 12, "error": null, "detail": [{"loc": "x"}]})),
        );
        assert_eq!(err.message(), "HTTP 400");
        assert_eq!(err.code(), None);
        assert!(err.body().is_some());
    }

    #[test]
    fn test_api_body_with_details() {
        let err = LedgerError::from_response(
            422,
            Some(json!({
                "error": "validation_error",
                "message": "Invalid request",
                "details": [{"field": "name", "message": "required"}]
            })),
        );
        let body = err.api_body().unwrap();
        assert_eq!(body.error, "validation_error");
        assert_eq!(body.details.len(), 1);
        assert_eq!(body.details[0].field, "name");
    }

    #[test]
    fn test_transport_errors() {
        let err = LedgerError::network("DNS resolution failed");
        assert_eq!(err.status(), 0);
        assert_eq!(err.code(), Some("network_error"));
        assert_eq!(err.message(), "DNS resolution failed");
        assert!(err.is_network());
        assert!(err.is_transport());

        let err = LedgerError::timed_out_after(Duration::from_millis(100));
        assert_eq!(err.status(), 0);
        assert_eq!(err.code(), Some("timeout"));
        assert_eq!(err.message(), "Request timed out after 100ms");
        assert!(err.is_timeout());
        assert!(err.body().is_none());
    }

    #[derive(Debug, Error)]
    #[error("error sending request")]
    struct Wrapper(#[source] Connect);

    #[derive(Debug, Error)]
    #[error("tcp connect error")]
    struct Connect(#[source] std::io::Error);

    #[test]
    fn test_root_cause_skips_wrappers() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "Connection refused");
        let err = Wrapper(Connect(io));
        assert_eq!(root_cause(&err), "Connection refused");

        let bare = std::io::Error::new(std::io::ErrorKind::Other, "DNS resolution failed");
        assert_eq!(root_cause(&bare), "DNS resolution failed");
    }

    #[test]
    fn test_decode_error_keeps_status() {
        let parse_err = serde_json::from_str::<Value>("<html>").unwrap_err();
        let err = LedgerError::decode(200, parse_err);
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert_eq!(err.status(), 200);
        assert_eq!(err.code(), Some("decode_error"));
        assert!(!err.is_transport());
    }
}
