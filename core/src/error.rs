//! Error types for the img-src client.
//!
//! # Design
//! A failed call is either a transport-level API error (a non-2xx status the
//! client could not parse into the documented error body, so only the status
//! is known) or a structured error response (`{"error": {...}}` with its own
//! nested status and message). Both stay distinguishable; [`classify`]
//! exposes the numeric status uniformly for callers that only care about it.

use std::error::Error as StdError;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http::HttpMetadata;

/// Errors returned by `ImgSrcClient` and `ImgSrc`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx status with a body that is not the documented error shape.
    #[error("API error: HTTP {status}")]
    Api {
        status: u16,
        body: String,
        http_meta: HttpMetadata,
    },

    /// The server answered with a structured error body.
    #[error(transparent)]
    Response(#[from] ErrorResponse),

    /// No HTTP response was obtained (connect failure, timeout, TLS, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// A 2xx response body did not match the expected shape.
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The request was rejected before being sent (empty id, missing file).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// HTTP status carried by this error, if it has one.
    pub fn status(&self) -> Option<u16> {
        classify(self).map(|c| c.status)
    }

    pub fn http_meta(&self) -> Option<&HttpMetadata> {
        match self {
            ApiError::Api { http_meta, .. } => Some(http_meta),
            ApiError::Response(resp) => Some(&resp.http_meta),
            _ => None,
        }
    }
}

/// Structured error body: `{"error": {"status": 403, "code": "...", "message": "..."}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Error)]
#[error("API error {}: {}", .error.status, .error.message)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
    /// Filled in by the client from the HTTP response, never from JSON.
    #[serde(skip)]
    pub http_meta: HttpMetadata,
}

impl ErrorResponse {
    pub fn error(&self) -> &ErrorDetail {
        &self.error
    }

    pub fn status(&self) -> i64 {
        self.error.status
    }

    pub fn message(&self) -> &str {
        &self.error.message
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorDetail {
    #[serde(deserialize_with = "crate::types::null_as_default")]
    pub status: i64,
    #[serde(deserialize_with = "crate::types::null_as_default")]
    pub code: String,
    #[serde(deserialize_with = "crate::types::null_as_default")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorDetail {
    pub fn status(&self) -> i64 {
        self.status
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Which of the two HTTP failure shapes an error was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Status code only; the body was not the documented error shape.
    Api,
    /// A parsed `{"error": {...}}` body.
    ErrorResponse,
}

/// Uniform view over an HTTP failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classified<'a> {
    pub kind: FailureKind,
    /// The HTTP status for `Api`, the body's nested status for `ErrorResponse`.
    pub status: u16,
    pub message: Option<&'a str>,
}

/// Classify an arbitrary error returned from a call.
///
/// Walks `err` and its `source()` chain looking for an [`ApiError`] or
/// [`ErrorResponse`]. Returns `None` for anything else; such errors are the
/// caller's to propagate unchanged.
pub fn classify<'a>(err: &'a (dyn StdError + 'static)) -> Option<Classified<'a>> {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(api) = e.downcast_ref::<ApiError>() {
            match api {
                ApiError::Api { status, .. } => {
                    return Some(Classified {
                        kind: FailureKind::Api,
                        status: *status,
                        message: None,
                    })
                }
                ApiError::Response(resp) => return Some(classify_response(resp)),
                _ => {}
            }
        }
        if let Some(resp) = e.downcast_ref::<ErrorResponse>() {
            return Some(classify_response(resp));
        }
        current = e.source();
    }
    None
}

fn classify_response(resp: &ErrorResponse) -> Classified<'_> {
    // A missing or out-of-range body status falls back to the transport status.
    let status = u16::try_from(resp.error.status)
        .ok()
        .filter(|s| *s != 0)
        .unwrap_or(resp.http_meta.status);
    Classified {
        kind: FailureKind::ErrorResponse,
        status,
        message: Some(&resp.error.message),
    }
}

/// True if `err` classifies with the given status.
pub fn is_http_status(err: &(dyn StdError + 'static), status: u16) -> bool {
    classify(err).is_some_and(|c| c.status == status)
}
