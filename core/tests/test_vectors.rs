//! Check request building, pagination and error mapping against the JSON
//! vectors in `test-vectors/`.
//!
//! Bodies are compared as parsed JSON, not raw strings, so key order in the
//! vector files does not matter.

use hcloud_core::{operations, ApiError, Error, HttpMethod, PaginationView, Params};
use serde_json::Value;

fn load(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap()
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn path_params(case: &Value) -> Vec<&str> {
    case["path_params"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect()
}

#[test]
fn request_vectors() {
    let vectors = load(include_str!("../../test-vectors/requests.json"));
    let base_url = vectors["base_url"].as_str().unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let op = operations::find(case["operation"].as_str().unwrap())
            .unwrap_or_else(|| panic!("{name}: unknown operation"));
        let params: Params = case["params"].as_object().cloned().unwrap();
        let expected = &case["expected"];

        let request = op.build(&path_params(case), params).unwrap();
        let http = request.to_http(base_url).unwrap();

        assert_eq!(http.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(http.url, expected["url"].as_str().unwrap(), "{name}: url");
        match (&http.body, &expected["body"]) {
            (None, Value::Null) => {
                assert_eq!(http.header("content-type"), None, "{name}: content-type");
            }
            (Some(body), want) if !want.is_null() => {
                let got: Value = serde_json::from_str(body).unwrap();
                assert_eq!(&got, want, "{name}: body");
                assert_eq!(http.header("content-type"), Some("application/json"), "{name}: content-type");
            }
            (got, want) => panic!("{name}: body mismatch, got {got:?}, want {want}"),
        }
        assert!(!(request.has_query() && request.has_body()), "{name}: query and body both set");
    }
}

#[test]
fn invalid_path_parameter_vectors() {
    let vectors = load(include_str!("../../test-vectors/requests.json"));

    for case in vectors["invalid"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let id = case["operation"].as_str().unwrap();
        let op = operations::find(id).unwrap();
        match op.build(&path_params(case), Params::new()) {
            Err(Error::InvalidPathParameter { operation, .. }) => assert_eq!(operation, id, "{name}"),
            other => panic!("{name}: expected InvalidPathParameter, got {other:?}"),
        }
    }
}

#[test]
fn pagination_vectors() {
    let vectors = load(include_str!("../../test-vectors/pagination.json"));

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let view = PaginationView::from_meta(&case["meta"]);
        let got = serde_json::to_value(&view).unwrap();
        assert_eq!(got, case["expected"], "{name}");
    }
}

#[test]
fn error_vectors() {
    let vectors = load(include_str!("../../test-vectors/errors.json"));

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let status = case["status"].as_u64().unwrap() as u16;
        let body = case["body"].as_str().unwrap();
        let expected = &case["expected"];

        let api = ApiError::from_status(status, body.as_bytes());
        assert_eq!(api.status, status, "{name}");
        assert_eq!(api.code, expected["code"].as_str().unwrap(), "{name}: code");
        assert_eq!(api.message, expected["message"].as_str().unwrap(), "{name}: message");
        assert_eq!(api.details.is_some(), expected["has_details"].as_bool().unwrap(), "{name}: details");
    }
}
