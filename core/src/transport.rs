//! The seam between the client and the network.
//!
//! # Design
//! A [`Transport`] takes a fully rendered [`HttpRequest`] and returns the raw
//! [`HttpResponse`], whatever its status. Status interpretation belongs to the
//! client, so a transport only fails when no HTTP exchange happened at all
//! (connection refused, DNS, TLS, timeout). [`UreqTransport`] is the
//! blocking default; any `Fn(HttpRequest, Duration) -> Result<HttpResponse>`
//! closure also works, which is how tests stand in for the network.

use std::time::Duration;

use crate::error::{Error, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

pub trait Transport: Send + Sync {
    /// Perform one exchange. Must not retry.
    fn send(&self, request: HttpRequest, timeout: Duration) -> Result<HttpResponse>;
}

impl<F> Transport for F
where
    F: Fn(HttpRequest, Duration) -> Result<HttpResponse> + Send + Sync,
{
    fn send(&self, request: HttpRequest, timeout: Duration) -> Result<HttpResponse> {
        self(request, timeout)
    }
}

/// Blocking transport backed by a shared `ureq` agent.
///
/// The agent keeps its connection pool across calls; cloning the transport
/// shares it. 4xx/5xx responses are returned as data.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl std::fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: HttpRequest, timeout: Duration) -> Result<HttpResponse> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let result = match method {
            HttpMethod::Get => {
                let mut req = self.agent.get(&url).config().timeout_global(Some(timeout)).build();
                for (name, value) in &headers {
                    req = req.header(name.as_str(), value.as_str());
                }
                req.call()
            }
            HttpMethod::Delete => {
                let mut req = self.agent.delete(&url).config().timeout_global(Some(timeout)).build();
                for (name, value) in &headers {
                    req = req.header(name.as_str(), value.as_str());
                }
                req.call()
            }
            HttpMethod::Post | HttpMethod::Put => {
                let builder = if method == HttpMethod::Post {
                    self.agent.post(&url)
                } else {
                    self.agent.put(&url)
                };
                let mut req = builder.config().timeout_global(Some(timeout)).build();
                for (name, value) in &headers {
                    req = req.header(name.as_str(), value.as_str());
                }
                match body {
                    Some(body) => req.send(body.as_bytes()),
                    None => req.send_empty(),
                }
            }
        };

        let mut response = result.map_err(|e| match e {
            ureq::Error::Timeout(_) => Error::transport_with_source(format!("{method} {url} timed out"), e),
            other => Error::transport_with_source(format!("{method} {url} failed"), other),
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_vec()
            .map_err(|e| Error::transport_with_source(format!("{method} {url}: reading body failed"), e))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
