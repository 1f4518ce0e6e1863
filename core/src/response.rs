//! Decoded API responses.
//!
//! # Design
//! [`Response`] is built once from an [`HttpResponse`] and never mutated. It
//! holds the decoded JSON body and the header metadata; typed accessors
//! deserialize from the body on every call, so the records they return are
//! independent copies tied to nothing.
//!
//! Accessors come in two policies:
//! - required ([`Response::item`], [`Response::items`]): an absent key is
//!   [`Error::MissingField`];
//! - optional ([`Response::optional`], [`Response::list_or_empty`]): an absent
//!   or `null` key is `None` / an empty list.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::http::HttpResponse;
use crate::meta::MetaInformation;
use crate::pagination::PaginationView;
use crate::types::Action;

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status: u16,
    body: Value,
    meta: MetaInformation,
}

impl Response {
    /// Decode a raw reply.
    ///
    /// A zero-length body decodes to an empty object; any other body must be
    /// valid JSON or this fails with [`Error::InvalidResponseBody`]. The
    /// status code is recorded but not checked here.
    pub fn from_http(raw: HttpResponse) -> Result<Self> {
        let meta = MetaInformation::from_response(&raw);
        let body = if raw.body.is_empty() {
            Value::Object(Map::new())
        } else {
            serde_json::from_slice(&raw.body).map_err(|e| Error::InvalidResponseBody(e.to_string()))?
        };
        Ok(Response {
            status: raw.status,
            body,
            meta,
        })
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn meta(&self) -> &MetaInformation {
        &self.meta
    }

    pub fn into_body(self) -> Value {
        self.body
    }

    /// Raw value under a top-level key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.body.get(key)
    }

    /// Required record under `key`.
    pub fn item<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let value = self.get(key).ok_or_else(|| Error::MissingField(key.to_string()))?;
        from_value(value)
    }

    /// Required list under `key`.
    pub fn items<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        self.item(key)
    }

    /// Optional record under `key`; absent and `null` both give `None`.
    pub fn optional<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => from_value(value).map(Some),
        }
    }

    /// Optional list under `key`; absent and `null` both give an empty list.
    pub fn list_or_empty<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        Ok(self.optional(key)?.unwrap_or_default())
    }

    /// The whole body as `T`; `T`'s field types decide what is required.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        from_value(&self.body)
    }

    /// Action started by the call, if the endpoint returns one. Optional.
    pub fn action(&self) -> Result<Option<Action>> {
        self.optional("action")
    }

    /// Actions listed by the call. Optional, empty when absent.
    pub fn actions(&self) -> Result<Vec<Action>> {
        self.list_or_empty("actions")
    }

    /// Position and navigation links of a list response.
    pub fn pagination(&self) -> PaginationView {
        PaginationView::from_meta(self.body.get("meta").unwrap_or(&Value::Null))
    }
}

fn from_value<T: DeserializeOwned>(value: &Value) -> Result<T> {
    T::deserialize(value).map_err(|e| Error::Deserialization(e.to_string()))
}
