//! Error types for the Hetzner Cloud client.
//!
//! # Design
//! A single [`Error`] enum covers every failure the client can surface. The
//! variants split along where the failure happened: encoding a request,
//! decoding a response, reaching the API at all, or the API itself refusing
//! the call. Structured API refusals carry an [`ApiError`] with the payload's
//! `code`/`message` so callers can match on codes such as `not_found`.
//!
//! Nothing in this crate retries; every error reaches the caller as-is.

use std::error::Error as StdError;

use serde::Deserialize;
use serde_json::Value;

use crate::meta::MetaInformation;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors returned by request building, dispatch and response decoding.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request parameters could not be encoded as a query string or JSON
    /// body.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A non-empty response body was not valid JSON.
    #[error("invalid response body: {0}")]
    InvalidResponseBody(String),

    /// The response JSON did not have the shape the caller asked for.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// A required key was absent from the response body.
    #[error("missing field `{0}` in response body")]
    MissingField(String),

    /// The path parameters do not fit the operation's URI template.
    #[error("invalid path parameter for {operation}: {reason}")]
    InvalidPathParameter {
        operation: &'static str,
        reason: String,
    },

    /// The API answered with a non-2xx status.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The API could not be reached (connection refused, timeout, TLS, ...).
    #[error("transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    /// The client configuration is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub fn transport(message: impl Into<String>) -> Self {
        Error::Transport {
            message: message.into(),
            source: None,
        }
    }

    pub fn transport_with_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Error::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// The structured API error, if this is one.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Error::Api(api) => Some(api),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.as_api().is_some_and(ApiError::is_not_found)
    }
}

/// Structured error reported by the API.
///
/// `code` is the payload's machine-readable code (`not_found`,
/// `uniqueness_error`, ...). When the body carries no error payload the code
/// falls back to the HTTP status code.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("API error {code} (HTTP {status}): {message}")]
pub struct ApiError {
    pub status: u16,
    pub code: String,
    pub message: String,
    pub details: Option<Value>,
    /// Request id and rate-limit headers of the failed reply.
    pub meta: MetaInformation,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorPayload,
}

#[derive(Deserialize)]
struct ErrorPayload {
    code: Option<String>,
    message: Option<String>,
    details: Option<Value>,
}

impl ApiError {
    /// Map a non-2xx status and its (possibly empty) body to an `ApiError`.
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        let payload = serde_json::from_slice::<ErrorEnvelope>(body)
            .ok()
            .map(|envelope| envelope.error);
        let (code, message, details) = match payload {
            Some(ErrorPayload {
                code,
                message,
                details,
            }) => (code, message, details),
            None => (None, None, None),
        };
        ApiError {
            status,
            code: code.unwrap_or_else(|| status.to_string()),
            message: message.unwrap_or_else(|| String::from_utf8_lossy(body).trim().to_string()),
            details,
            meta: MetaInformation::default(),
        }
    }

    pub fn with_meta(mut self, meta: MetaInformation) -> Self {
        self.meta = meta;
        self
    }

    pub fn is_not_found(&self) -> bool {
        self.code == "not_found" || self.status == 404
    }

    pub fn is_rate_limited(&self) -> bool {
        self.code == "rate_limit_exceeded" || self.status == 429
    }

    pub fn is_unauthorized(&self) -> bool {
        self.code == "unauthorized" || self.status == 401
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Refused;

    impl std::fmt::Display for Refused {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("connection refused")
        }
    }

    impl StdError for Refused {}

    #[test]
    fn api_error_reads_payload() {
        let body = br#"{"error":{"code":"not_found","message":"server with ID '42' not found","details":{}}}"#;
        let err = ApiError::from_status(404, body);
        assert_eq!(err.code, "not_found");
        assert_eq!(err.message, "server with ID '42' not found");
        assert_eq!(err.details, Some(serde_json::json!({})));
        assert!(err.is_not_found());
    }

    #[test]
    fn api_error_falls_back_to_status_code() {
        let err = ApiError::from_status(502, b"bad gateway");
        assert_eq!(err.code, "502");
        assert_eq!(err.message, "bad gateway");
        assert!(err.details.is_none());
    }

    #[test]
    fn api_error_payload_without_code_uses_status() {
        let err = ApiError::from_status(409, br#"{"error":{"message":"conflict"}}"#);
        assert_eq!(err.code, "409");
        assert_eq!(err.message, "conflict");
    }

    #[test]
    fn transport_error_keeps_source() {
        let err = Error::transport_with_source("dial api.hetzner.cloud", Refused);
        let source = err.source().expect("source");
        assert_eq!(source.to_string(), "connection refused");
        assert_eq!(err.to_string(), "transport error: dial api.hetzner.cloud");
    }

    #[test]
    fn not_found_through_error() {
        let err = Error::from(ApiError::from_status(404, b""));
        assert!(err.is_not_found());
        assert!(!Error::MissingField("server".into()).is_not_found());
    }

    #[test]
    fn display_messages() {
        assert_eq!(
            Error::MissingField("server".into()).to_string(),
            "missing field `server` in response body"
        );
        let api = ApiError::from_status(429, br#"{"error":{"code":"rate_limit_exceeded","message":"slow down"}}"#);
        assert!(api.is_rate_limited());
        assert_eq!(
            api.to_string(),
            "API error rate_limit_exceeded (HTTP 429): slow down"
        );
    }
}
