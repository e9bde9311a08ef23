//! Executing `HttpRequest` values.
//!
//! # Design
//! `Transport` is the single I/O seam. `UreqTransport` is the default
//! blocking implementation; tests and embedders can supply their own (any
//! `Fn(&HttpRequest) -> Result<HttpResponse, ApiError>` qualifies).
//!
//! Non-2xx statuses are returned as data, never as transport errors, so that
//! `ImgSrcClient::parse_*` stays the only place that interprets them.

use std::time::Duration;

use ureq::typestate::{WithBody, WithoutBody};
use ureq::{Agent, RequestBuilder};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<F> Transport for F
where
    F: Fn(&HttpRequest) -> Result<HttpResponse, ApiError> + Send + Sync,
{
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        self(request)
    }
}

/// Blocking transport over a pooled `ureq::Agent`.
///
/// `timeout` bounds each whole call: connect, send and reading the body.
#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
    timeout: Duration,
}

impl std::fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UreqTransport").field("timeout", &self.timeout).finish()
    }
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent, timeout }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = request.url.as_str();
        let body = request.body.as_deref();
        let result = match request.method {
            HttpMethod::Get => without_body(self.agent.get(url), request).call(),
            HttpMethod::Delete => without_body(self.agent.delete(url), request).call(),
            HttpMethod::Post => send(self.agent.post(url), request, body),
            HttpMethod::Put => send(self.agent.put(url), request, body),
            HttpMethod::Patch => send(self.agent.patch(url), request, body),
        };
        let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(HttpResponse { status, headers, body })
    }
}

fn without_body(
    builder: RequestBuilder<WithoutBody>,
    request: &HttpRequest,
) -> RequestBuilder<WithoutBody> {
    request
        .headers
        .iter()
        .fold(builder, |b, (k, v)| b.header(k.as_str(), v.as_str()))
}

fn send(
    builder: RequestBuilder<WithBody>,
    request: &HttpRequest,
    body: Option<&[u8]>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    let builder = request
        .headers
        .iter()
        .fold(builder, |b, (k, v)| b.header(k.as_str(), v.as_str()));
    match body {
        Some(bytes) => builder.send(bytes),
        None => builder.send_empty(),
    }
}
