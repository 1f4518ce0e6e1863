//! In-memory imitation of a slice of the Hetzner Cloud API.
//!
//! Serves servers, volumes and actions under `/v1` with the same envelope
//! the real API uses: list bodies carry `meta.pagination`, errors carry
//! `{"error": {"code", "message", "details"}}`, and every reply carries
//! `x-request-id` plus the three rate-limit headers. Requests must present
//! `Authorization: Bearer <token>`.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::{HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Token accepted by [`app`].
pub const TOKEN: &str = "mock-token";
pub const RATE_LIMIT: u64 = 3600;
pub const RATE_LIMIT_RESET: &str = "1731000000";
const MAX_PER_PAGE: i64 = 50;
const TIMESTAMP: &str = "2024-11-07T12:00:00+00:00";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Server {
    pub id: i64,
    pub name: String,
    pub status: String,
    pub created: String,
    pub server_type: ServerType,
    pub labels: BTreeMap<String, String>,
    pub volumes: Vec<i64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerType {
    pub id: i64,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Volume {
    pub id: i64,
    pub name: String,
    pub size: u64,
    pub status: String,
    pub server: Option<i64>,
    pub labels: BTreeMap<String, String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Action {
    pub id: i64,
    pub command: String,
    pub status: String,
    pub progress: u8,
    pub started: String,
    pub finished: Option<String>,
    pub resources: Vec<Value>,
    pub error: Option<Value>,
}

#[derive(Deserialize)]
pub struct CreateServer {
    pub name: Option<String>,
    pub server_type: Option<String>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

#[derive(Deserialize)]
pub struct CreateVolume {
    pub name: Option<String>,
    pub size: Option<u64>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub name: Option<String>,
}

#[derive(Default)]
pub struct Store {
    next_id: i64,
    servers: BTreeMap<i64, Server>,
    volumes: BTreeMap<i64, Volume>,
    actions: BTreeMap<i64, Action>,
}

impl Store {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn finished_action(&mut self, command: &str, resource_id: i64, kind: &str) -> Action {
        let action = Action {
            id: self.next_id(),
            command: command.to_string(),
            status: "success".to_string(),
            progress: 100,
            started: TIMESTAMP.to_string(),
            finished: Some(TIMESTAMP.to_string()),
            resources: vec![json!({"id": resource_id, "type": kind})],
            error: None,
        };
        self.actions.insert(action.id, action.clone());
        action
    }
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Clone)]
pub struct AppState {
    db: Db,
    token: Arc<str>,
    remaining: Arc<AtomicU64>,
}

pub fn app() -> Router {
    app_with_token(TOKEN)
}

pub fn app_with_token(token: &str) -> Router {
    let state = AppState {
        db: Arc::new(RwLock::new(Store::default())),
        token: Arc::from(token),
        remaining: Arc::new(AtomicU64::new(RATE_LIMIT)),
    };
    let api = Router::new()
        .route("/servers", get(list_servers).post(create_server))
        .route("/servers/{id}", get(get_server).delete(delete_server))
        .route("/servers/{id}/actions/poweron", post(power_on_server))
        .route("/servers/{id}/actions/poweroff", post(power_off_server))
        .route("/volumes", get(list_volumes).post(create_volume))
        .route("/volumes/{id}", get(get_volume).delete(delete_volume))
        .route("/actions/{id}", get(get_action));
    Router::new()
        .nest("/v1", api)
        .layer(middleware::from_fn_with_state(state.clone(), envelope))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Structured error reply in the API's shape.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    fn not_found(kind: &str, id: i64) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("{kind} with ID '{id}' not found"),
        )
    }

    fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_input", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": {"code": self.code, "message": self.message, "details": {}}
        });
        (self.status, Json(body)).into_response()
    }
}

/// Bearer check plus request-id and rate-limit headers on every reply.
async fn envelope(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let expected = format!("Bearer {}", state.token);
    let authorized = request
        .headers()
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == expected);

    let method = request.method().clone();
    let uri = request.uri().clone();
    let mut response = if authorized {
        next.run(request).await
    } else {
        ApiError::new(StatusCode::UNAUTHORIZED, "unauthorized", "unable to authenticate").into_response()
    };

    let remaining = state
        .remaining
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| Some(n.saturating_sub(1)))
        .map_or(0, |previous| previous.saturating_sub(1));
    let headers = response.headers_mut();
    if let Ok(id) = HeaderValue::from_str(&Uuid::new_v4().to_string()) {
        headers.insert("x-request-id", id);
    }
    headers.insert("x-ratelimit-limit", HeaderValue::from(RATE_LIMIT));
    headers.insert("x-ratelimit-remaining", HeaderValue::from(remaining));
    headers.insert("x-ratelimit-reset", HeaderValue::from_static(RATE_LIMIT_RESET));
    tracing::debug!(%method, %uri, status = response.status().as_u16(), remaining, "handled request");
    response
}

/// Slice `items` to the requested page and build `meta.pagination`.
fn paginate<T: Clone>(items: &[T], params: &ListParams) -> Result<(Vec<T>, Value), ApiError> {
    let page = params.page.unwrap_or(1);
    let per_page = params.per_page.unwrap_or(25);
    if page < 1 || !(1..=MAX_PER_PAGE).contains(&per_page) {
        return Err(ApiError::invalid_input("invalid pagination parameters"));
    }
    let total = items.len() as i64;
    let last_page = ((total + per_page - 1) / per_page).max(1);
    let start = page.saturating_sub(1).saturating_mul(per_page).min(total) as usize;
    let end = page.saturating_mul(per_page).min(total) as usize;
    let meta = json!({
        "pagination": {
            "page": page,
            "per_page": per_page,
            "previous_page": if page > 1 { json!(page - 1) } else { Value::Null },
            "next_page": if page < last_page { json!(page + 1) } else { Value::Null },
            "last_page": last_page,
            "total_entries": total,
        }
    });
    Ok((items[start..end].to_vec(), meta))
}

async fn list_servers(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>, ApiError> {
    let store = state.db.read().await;
    let servers: Vec<Server> = store
        .servers
        .values()
        .filter(|s| params.name.as_ref().map_or(true, |name| &s.name == name))
        .cloned()
        .collect();
    let (page, meta) = paginate(&servers, &params)?;
    Ok(Json(json!({"servers": page, "meta": meta})))
}

async fn create_server(
    State(state): State<AppState>,
    Json(input): Json<CreateServer>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let name = input
        .name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::invalid_input("name is required"))?;
    let server_type = input
        .server_type
        .ok_or_else(|| ApiError::invalid_input("server_type is required"))?;

    let mut store = state.db.write().await;
    if store.servers.values().any(|s| s.name == name) {
        return Err(ApiError::new(
            StatusCode::CONFLICT,
            "uniqueness_error",
            "server name is already used",
        ));
    }
    let server = Server {
        id: store.next_id(),
        name,
        status: "running".to_string(),
        created: TIMESTAMP.to_string(),
        server_type: ServerType { id: 1, name: server_type },
        labels: input.labels,
        volumes: Vec::new(),
    };
    store.servers.insert(server.id, server.clone());
    let action = store.finished_action("create_server", server.id, "server");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "server": server,
            "action": action,
            "next_actions": [],
            "root_password": "YItygq1v3GYjjMomLaKc"
        })),
    ))
}

async fn get_server(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Value>, ApiError> {
    let store = state.db.read().await;
    let server = store.servers.get(&id).ok_or_else(|| ApiError::not_found("server", id))?;
    Ok(Json(json!({"server": server})))
}

async fn delete_server(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Value>, ApiError> {
    let mut store = state.db.write().await;
    store.servers.remove(&id).ok_or_else(|| ApiError::not_found("server", id))?;
    for volume in store.volumes.values_mut().filter(|v| v.server == Some(id)) {
        volume.server = None;
    }
    let action = store.finished_action("delete_server", id, "server");
    Ok(Json(json!({"action": action})))
}

async fn power_on_server(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    set_server_status(state, id, "running", "start_server").await
}

async fn power_off_server(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    set_server_status(state, id, "off", "stop_server").await
}

async fn set_server_status(
    state: AppState,
    id: i64,
    status: &str,
    command: &str,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let mut store = state.db.write().await;
    let server = store.servers.get_mut(&id).ok_or_else(|| ApiError::not_found("server", id))?;
    server.status = status.to_string();
    let action = store.finished_action(command, id, "server");
    Ok((StatusCode::CREATED, Json(json!({"action": action}))))
}

async fn list_volumes(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>, ApiError> {
    let store = state.db.read().await;
    let volumes: Vec<Volume> = store
        .volumes
        .values()
        .filter(|v| params.name.as_ref().map_or(true, |name| &v.name == name))
        .cloned()
        .collect();
    let (page, meta) = paginate(&volumes, &params)?;
    Ok(Json(json!({"volumes": page, "meta": meta})))
}

async fn create_volume(
    State(state): State<AppState>,
    Json(input): Json<CreateVolume>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let name = input
        .name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::invalid_input("name is required"))?;
    let size = input
        .size
        .filter(|size| *size >= 10)
        .ok_or_else(|| ApiError::invalid_input("size must be at least 10 GB"))?;

    let mut store = state.db.write().await;
    let volume = Volume {
        id: store.next_id(),
        name,
        size,
        status: "available".to_string(),
        server: None,
        labels: input.labels,
    };
    store.volumes.insert(volume.id, volume.clone());
    let action = store.finished_action("create_volume", volume.id, "volume");
    Ok((
        StatusCode::CREATED,
        Json(json!({"volume": volume, "action": action, "next_actions": []})),
    ))
}

async fn get_volume(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Value>, ApiError> {
    let store = state.db.read().await;
    let volume = store.volumes.get(&id).ok_or_else(|| ApiError::not_found("volume", id))?;
    Ok(Json(json!({"volume": volume})))
}

async fn delete_volume(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode, ApiError> {
    let mut store = state.db.write().await;
    store
        .volumes
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| ApiError::not_found("volume", id))
}

async fn get_action(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Value>, ApiError> {
    let store = state.db.read().await;
    let action = store.actions.get(&id).ok_or_else(|| ApiError::not_found("action", id))?;
    Ok(Json(json!({"action": action})))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    fn params(page: Option<i64>, per_page: Option<i64>) -> ListParams {
        ListParams {
            page,
            per_page,
            name: None,
        }
    }

    #[test]
    fn paginate_middle_page() {
        let (page, meta) = paginate(&items(120), &params(Some(2), Some(25))).unwrap();
        assert_eq!(page.first(), Some(&25));
        assert_eq!(page.len(), 25);
        assert_eq!(meta["pagination"]["previous_page"], 1);
        assert_eq!(meta["pagination"]["next_page"], 3);
        assert_eq!(meta["pagination"]["last_page"], 5);
        assert_eq!(meta["pagination"]["total_entries"], 120);
    }

    #[test]
    fn paginate_empty_list() {
        let (page, meta) = paginate(&items(0), &params(None, None)).unwrap();
        assert!(page.is_empty());
        assert_eq!(meta["pagination"]["last_page"], 1);
        assert!(meta["pagination"]["previous_page"].is_null());
        assert!(meta["pagination"]["next_page"].is_null());
    }

    #[test]
    fn paginate_past_the_end() {
        let (page, _) = paginate(&items(3), &params(Some(4), Some(25))).unwrap();
        assert!(page.is_empty());
    }

    #[test]
    fn paginate_huge_page_is_empty() {
        let (page, meta) = paginate(&items(3), &params(Some(i64::MAX), Some(50))).unwrap();
        assert!(page.is_empty());
        assert_eq!(meta["pagination"]["previous_page"], i64::MAX - 1);
        assert!(meta["pagination"]["next_page"].is_null());
    }

    #[test]
    fn paginate_rejects_bad_params() {
        assert!(paginate(&items(3), &params(Some(0), None)).is_err());
        assert!(paginate(&items(3), &params(None, Some(51))).is_err());
    }

    #[test]
    fn server_serializes_like_the_api() {
        let server = Server {
            id: 42,
            name: "web-1".to_string(),
            status: "running".to_string(),
            created: TIMESTAMP.to_string(),
            server_type: ServerType { id: 1, name: "cx22".to_string() },
            labels: BTreeMap::new(),
            volumes: Vec::new(),
        };
        let json = serde_json::to_value(&server).unwrap();
        assert_eq!(json["id"], 42);
        assert_eq!(json["server_type"]["name"], "cx22");
        assert_eq!(json["labels"], json!({}));
    }

    #[test]
    fn create_server_fields_optional_at_parse_time() {
        let input: CreateServer = serde_json::from_str(r#"{"name":"web"}"#).unwrap();
        assert_eq!(input.name.as_deref(), Some("web"));
        assert!(input.server_type.is_none());
        assert!(input.labels.is_empty());
    }
}
