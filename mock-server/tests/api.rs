use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use hcloud_mock::{app, app_with_token, Server, Volume, RATE_LIMIT, TOKEN};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, format!("Bearer {TOKEN}"))
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn get(uri: &str) -> Request<String> {
    request("GET", uri, "")
}

async fn create_server(app: &Router, name: &str) -> Server {
    let body = format!(r#"{{"name":"{name}","server_type":"cx22","image":"ubuntu-24.04"}}"#);
    let resp = app.clone().oneshot(request("POST", "/v1/servers", &body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    serde_json::from_value(body_json(resp).await["server"].clone()).unwrap()
}

// --- envelope ---

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let resp = app()
        .oneshot(Request::builder().uri("/v1/servers").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key("x-request-id"));
    let body = body_json(resp).await;
    assert_eq!(body["error"]["code"], "unauthorized");
}

#[tokio::test]
async fn custom_token_is_honoured() {
    let resp = app_with_token("other").oneshot(get("/v1/servers")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn every_reply_carries_metadata_headers() {
    let resp = app().oneshot(get("/v1/servers")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let headers = resp.headers();
    assert_eq!(headers["x-request-id"].to_str().unwrap().len(), 36);
    assert_eq!(headers["x-ratelimit-limit"], RATE_LIMIT.to_string().as_str());
    assert_eq!(headers["x-ratelimit-remaining"], (RATE_LIMIT - 1).to_string().as_str());
    assert!(headers.contains_key("x-ratelimit-reset"));
}

#[tokio::test]
async fn remaining_budget_decreases() {
    let app = app();
    app.clone().oneshot(get("/v1/servers")).await.unwrap();
    let resp = app.oneshot(get("/v1/servers")).await.unwrap();
    assert_eq!(resp.headers()["x-ratelimit-remaining"], (RATE_LIMIT - 2).to_string().as_str());
}

// --- servers ---

#[tokio::test]
async fn list_servers_empty_has_pagination() {
    let resp = app().oneshot(get("/v1/servers")).await.unwrap();

    let body = body_json(resp).await;
    assert_eq!(body["servers"], serde_json::json!([]));
    let pagination = &body["meta"]["pagination"];
    assert_eq!(pagination["page"], 1);
    assert_eq!(pagination["per_page"], 25);
    assert_eq!(pagination["last_page"], 1);
    assert_eq!(pagination["total_entries"], 0);
    assert!(pagination["next_page"].is_null());
}

#[tokio::test]
async fn create_server_returns_action_and_password() {
    let app = app();
    let body = r#"{"name":"web-1","server_type":"cx22","labels":{"env":"prod"}}"#;
    let resp = app.oneshot(request("POST", "/v1/servers", body)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await;
    assert_eq!(body["server"]["name"], "web-1");
    assert_eq!(body["server"]["labels"]["env"], "prod");
    assert_eq!(body["action"]["command"], "create_server");
    assert_eq!(body["action"]["status"], "success");
    assert!(body["root_password"].is_string());
}

#[tokio::test]
async fn create_server_requires_name() {
    let resp = app()
        .oneshot(request("POST", "/v1/servers", r#"{"server_type":"cx22"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"]["code"], "invalid_input");
}

#[tokio::test]
async fn duplicate_server_name_conflicts() {
    let app = app();
    create_server(&app, "dup").await;
    let resp = app
        .oneshot(request("POST", "/v1/servers", r#"{"name":"dup","server_type":"cx22"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(resp).await["error"]["code"], "uniqueness_error");
}

#[tokio::test]
async fn list_servers_pages_and_filters() {
    let app = app();
    for i in 0..3 {
        create_server(&app, &format!("node-{i}")).await;
    }

    let resp = app.clone().oneshot(get("/v1/servers?page=2&per_page=2")).await.unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["servers"].as_array().unwrap().len(), 1);
    assert_eq!(body["meta"]["pagination"]["previous_page"], 1);
    assert_eq!(body["meta"]["pagination"]["last_page"], 2);
    assert_eq!(body["meta"]["pagination"]["total_entries"], 3);

    let resp = app.oneshot(get("/v1/servers?name=node-1")).await.unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["servers"][0]["name"], "node-1");
    assert_eq!(body["meta"]["pagination"]["total_entries"], 1);
}

#[tokio::test]
async fn get_missing_server_is_not_found() {
    let resp = app().oneshot(get("/v1/servers/999")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["code"], "not_found");
    assert_eq!(body["error"]["message"], "server with ID '999' not found");
}

#[tokio::test]
async fn power_off_then_on() {
    let app = app();
    let server = create_server(&app, "toggle").await;

    let uri = format!("/v1/servers/{}/actions/poweroff", server.id);
    let resp = app.clone().oneshot(request("POST", &uri, "")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(body_json(resp).await["action"]["command"], "stop_server");

    let resp = app.clone().oneshot(get(&format!("/v1/servers/{}", server.id))).await.unwrap();
    assert_eq!(body_json(resp).await["server"]["status"], "off");

    let uri = format!("/v1/servers/{}/actions/poweron", server.id);
    let resp = app.clone().oneshot(request("POST", &uri, "")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = app.oneshot(get(&format!("/v1/servers/{}", server.id))).await.unwrap();
    assert_eq!(body_json(resp).await["server"]["status"], "running");
}

#[tokio::test]
async fn delete_server_then_lookup_action() {
    let app = app();
    let server = create_server(&app, "gone").await;

    let uri = format!("/v1/servers/{}", server.id);
    let resp = app.clone().oneshot(request("DELETE", &uri, "")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let action_id = body_json(resp).await["action"]["id"].as_i64().unwrap();

    let resp = app.clone().oneshot(get(&uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app.oneshot(get(&format!("/v1/actions/{action_id}"))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["action"]["command"], "delete_server");
}

// --- volumes ---

#[tokio::test]
async fn volume_lifecycle() {
    let app = app();
    let resp = app
        .clone()
        .oneshot(request("POST", "/v1/volumes", r#"{"name":"data","size":10}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let volume: Volume = serde_json::from_value(body_json(resp).await["volume"].clone()).unwrap();
    assert_eq!(volume.size, 10);

    let resp = app.clone().oneshot(get("/v1/volumes")).await.unwrap();
    assert_eq!(body_json(resp).await["volumes"][0]["name"], "data");

    let uri = format!("/v1/volumes/{}", volume.id);
    let resp = app.clone().oneshot(request("DELETE", &uri, "")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.is_empty());

    let resp = app.oneshot(get(&uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn small_volume_is_rejected() {
    let resp = app()
        .oneshot(request("POST", "/v1/volumes", r#"{"name":"tiny","size":1}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_action_is_not_found() {
    let resp = app().oneshot(get("/v1/actions/77")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
