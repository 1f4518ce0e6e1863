//! Immutable description of one API call.
//!
//! # Design
//! A [`Request`] is the method, the path (parameters already substituted) and
//! the call's parameters. Where the parameters go is decided by the
//! operation's [`PayloadPolicy`] and recorded in the [`Payload`] variant, so a
//! request carries a query string or a JSON body, never both.
//! [`Request::to_http`] renders it into an [`HttpRequest`] against a base URL.

use serde_json::{Map, Value};
use url::form_urlencoded;

use crate::error::{Error, Result};
use crate::http::{HttpMethod, HttpRequest};

/// Ordered parameter map sent with a request.
pub type Params = Map<String, Value>;

/// Where an operation puts its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadPolicy {
    /// Parameters are ignored; plain retrieve and delete calls.
    None,
    /// Parameters become the URL query string; list and filter calls.
    Query,
    /// Parameters become a JSON document in the body; create and update calls.
    Body,
}

/// Parameters after the payload policy has been applied.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    None,
    Query(Params),
    Body(Params),
}

impl Payload {
    pub fn new(policy: PayloadPolicy, params: Params) -> Self {
        match policy {
            PayloadPolicy::None => Payload::None,
            PayloadPolicy::Query => Payload::Query(params),
            PayloadPolicy::Body => Payload::Body(params),
        }
    }

    pub fn policy(&self) -> PayloadPolicy {
        match self {
            Payload::None => PayloadPolicy::None,
            Payload::Query(_) => PayloadPolicy::Query,
            Payload::Body(_) => PayloadPolicy::Body,
        }
    }
}

/// One API call, ready to be rendered for a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    operation: &'static str,
    method: HttpMethod,
    uri: String,
    payload: Payload,
}

impl Request {
    pub(crate) fn new(operation: &'static str, method: HttpMethod, uri: String, payload: Payload) -> Self {
        Self {
            operation,
            method,
            uri,
            payload,
        }
    }

    /// Identifier of the operation this request was built from.
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Path relative to the API base URL, e.g. `/servers/42/actions/poweron`.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn has_query(&self) -> bool {
        matches!(self.payload, Payload::Query(_))
    }

    pub fn has_body(&self) -> bool {
        matches!(self.payload, Payload::Body(_))
    }

    /// Encoded query string without the leading `?`; `None` unless the query
    /// policy applies and at least one parameter survives encoding.
    pub fn query_string(&self) -> Result<Option<String>> {
        match &self.payload {
            Payload::Query(params) => encode_query(params),
            _ => Ok(None),
        }
    }

    /// JSON body; `None` unless the body policy applies.
    pub fn body(&self) -> Result<Option<String>> {
        match &self.payload {
            Payload::Body(params) => serde_json::to_string(params)
                .map(Some)
                .map_err(|e| Error::Serialization(e.to_string())),
            _ => Ok(None),
        }
    }

    /// Render into a transport-ready request against `base_url`.
    pub fn to_http(&self, base_url: &str) -> Result<HttpRequest> {
        let mut url = format!("{}{}", base_url.trim_end_matches('/'), self.uri);
        if let Some(query) = self.query_string()? {
            url.push('?');
            url.push_str(&query);
        }

        let body = self.body()?;
        let headers = if body.is_some() {
            vec![("content-type".to_string(), "application/json".to_string())]
        } else {
            Vec::new()
        };

        Ok(HttpRequest {
            method: self.method,
            url,
            headers,
            body,
        })
    }
}

/// Encode parameters as `application/x-www-form-urlencoded`.
///
/// Arrays repeat their key once per element, `null` values are dropped and
/// nested objects have no query representation.
fn encode_query(params: &Params) -> Result<Option<String>> {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    let mut written = false;
    for (key, value) in params {
        match value {
            Value::Array(items) => {
                for item in items {
                    if let Some(text) = scalar_text(key, item)? {
                        serializer.append_pair(key, &text);
                        written = true;
                    }
                }
            }
            other => {
                if let Some(text) = scalar_text(key, other)? {
                    serializer.append_pair(key, &text);
                    written = true;
                }
            }
        }
    }
    Ok(written.then(|| serializer.finish()))
}

fn scalar_text(key: &str, value: &Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Array(_) | Value::Object(_) => Err(Error::Serialization(format!(
            "query parameter `{key}` cannot be a nested structure"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Params {
        match value {
            Value::Object(map) => map,
            _ => panic!("params must be an object"),
        }
    }

    fn request(method: HttpMethod, uri: &str, payload: Payload) -> Request {
        Request::new("test", method, uri.to_string(), payload)
    }

    #[test]
    fn query_request_renders_query_string() {
        let req = request(
            HttpMethod::Get,
            "/servers",
            Payload::Query(params(json!({"name": "web 1", "page": 2, "sort": "id:asc"}))),
        );
        let http = req.to_http("https://api.hetzner.cloud/v1").unwrap();
        assert_eq!(http.method, HttpMethod::Get);
        assert_eq!(
            http.url,
            "https://api.hetzner.cloud/v1/servers?name=web+1&page=2&sort=id%3Aasc"
        );
        assert!(http.body.is_none());
        assert!(http.headers.is_empty());
    }

    #[test]
    fn query_arrays_repeat_key_and_nulls_drop() {
        let req = request(
            HttpMethod::Get,
            "/servers",
            Payload::Query(params(json!({"status": ["running", "off"], "name": null}))),
        );
        assert_eq!(
            req.query_string().unwrap().as_deref(),
            Some("status=running&status=off")
        );
    }

    #[test]
    fn empty_query_has_no_question_mark() {
        let req = request(HttpMethod::Get, "/servers", Payload::Query(Params::new()));
        let http = req.to_http("https://api.hetzner.cloud/v1/").unwrap();
        assert_eq!(http.url, "https://api.hetzner.cloud/v1/servers");
    }

    #[test]
    fn nested_query_value_fails() {
        let req = request(
            HttpMethod::Get,
            "/servers",
            Payload::Query(params(json!({"filter": {"a": 1}}))),
        );
        let err = req.to_http("http://localhost").unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn body_request_renders_json() {
        let req = request(
            HttpMethod::Post,
            "/volumes",
            Payload::Body(params(json!({"name": "data", "size": 10, "labels": {"env": "prod"}}))),
        );
        let http = req.to_http("http://localhost:3000").unwrap();
        assert_eq!(http.url, "http://localhost:3000/volumes");
        assert_eq!(http.header("Content-Type"), Some("application/json"));
        let body: Value = serde_json::from_str(http.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"name": "data", "size": 10, "labels": {"env": "prod"}}));
    }

    #[test]
    fn body_keeps_insertion_order() {
        let mut map = Params::new();
        map.insert("server_type".into(), json!("cx22"));
        map.insert("name".into(), json!("web"));
        map.insert("image".into(), json!("ubuntu-24.04"));
        let req = request(HttpMethod::Post, "/servers", Payload::Body(map));
        assert_eq!(
            req.body().unwrap().as_deref(),
            Some(r#"{"server_type":"cx22","name":"web","image":"ubuntu-24.04"}"#)
        );
    }

    #[test]
    fn none_payload_has_neither() {
        let req = request(HttpMethod::Delete, "/servers/42", Payload::None);
        assert!(!req.has_body());
        assert!(!req.has_query());
        let http = req.to_http("http://localhost").unwrap();
        assert_eq!(http.url, "http://localhost/servers/42");
        assert!(http.body.is_none());
    }

    #[test]
    fn payload_policy_round_trips() {
        for policy in [PayloadPolicy::None, PayloadPolicy::Query, PayloadPolicy::Body] {
            assert_eq!(Payload::new(policy, Params::new()).policy(), policy);
        }
    }
}
