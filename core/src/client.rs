//! Client facade: configuration, dispatch and decoding.
//!
//! # Design
//! `Client` owns the validated [`Config`] and a shared handle to a
//! [`Transport`]. Building a call is pure: resource-family handles
//! ([`Client::servers`], [`Client::volumes`], ...) only produce [`Request`]
//! values. I/O happens when a request is passed to [`Client::execute`] (or
//! the handle's `send`), which renders it, attaches credentials and default
//! headers, performs exactly one exchange and decodes the reply.

use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::config::Config;
use crate::error::{ApiError, Error, Result};
use crate::http::HttpRequest;
use crate::meta::MetaInformation;
use crate::request::Request;
use crate::response::Response;
use crate::transport::{Transport, UreqTransport};

/// Entry point to the API. Cheap to clone; clones share the transport.
pub struct Client<T: Transport = UreqTransport> {
    config: Arc<Config>,
    transport: Arc<T>,
}

impl<T: Transport> std::fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<T: Transport> Clone for Client<T> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            transport: Arc::clone(&self.transport),
        }
    }
}

impl Client<UreqTransport> {
    /// Client with the default blocking transport.
    pub fn new(config: Config) -> Result<Self> {
        Self::with_transport(config, UreqTransport::new())
    }

    /// Client configured from `HCLOUD_TOKEN`, `HCLOUD_ENDPOINT` and
    /// `HCLOUD_TIMEOUT`.
    pub fn from_env() -> Result<Self> {
        Self::new(Config::from_env()?)
    }
}

impl<T: Transport> Client<T> {
    /// Validates `config` up front: an empty token or an unusable base URL
    /// fails here rather than on the first call.
    pub fn with_transport(config: Config, transport: T) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            transport: Arc::new(transport),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Render `request` with credentials and default headers, without sending
    /// it.
    pub fn prepare(&self, request: &Request) -> Result<HttpRequest> {
        let mut http = request.to_http(&self.config.base_url)?;
        let mut headers = vec![
            ("authorization".to_string(), format!("Bearer {}", self.config.token)),
            ("user-agent".to_string(), self.config.user_agent.clone()),
            ("accept".to_string(), "application/json".to_string()),
        ];
        headers.extend(self.config.headers.iter().cloned());
        headers.append(&mut http.headers);
        http.headers = headers;
        Ok(http)
    }

    /// Send `request` once and decode the reply.
    ///
    /// Non-2xx replies become [`Error::Api`]; a 2xx reply with a malformed
    /// body is [`Error::InvalidResponseBody`].
    pub fn execute(&self, request: &Request) -> Result<Response> {
        let http = self.prepare(request)?;
        debug!(
            operation = request.operation(),
            method = %http.method,
            uri = request.uri(),
            "dispatching request"
        );

        let raw = self.transport.send(http, self.config.timeout)?;
        if !raw.is_success() {
            let api = ApiError::from_status(raw.status, &raw.body)
                .with_meta(MetaInformation::from_response(&raw));
            warn!(
                operation = request.operation(),
                status = api.status,
                code = %api.code,
                request_id = api.meta.request_id.as_deref().unwrap_or("-"),
                "API returned an error"
            );
            return Err(Error::Api(api));
        }

        let response = Response::from_http(raw)?;
        let meta = response.meta();
        debug!(
            operation = request.operation(),
            status = response.status(),
            request_id = meta.request_id.as_deref().unwrap_or("-"),
            "decoded response"
        );
        trace!(
            limit = meta.rate_limit_limit.as_deref(),
            remaining = meta.rate_limit_remaining.as_deref(),
            reset = meta.rate_limit_reset.as_deref(),
            "rate limit"
        );
        Ok(response)
    }
}
