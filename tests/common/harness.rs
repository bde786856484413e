//! Fake ranking service harness.
//!
//! Serves the ranking API under `/api` on an ephemeral port, records every
//! request (with its cache headers), and can be told to fail specific routes.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Request, State};
use axum::http::{HeaderName, StatusCode};
use axum::http::header::{CACHE_CONTROL, PRAGMA};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

const STARTUP_WAIT_TIMEOUT_SECS: u64 = 5;
const STARTUP_POLL_INTERVAL_MS: u64 = 50;

#[derive(Debug, Clone, Default)]
pub struct TestServerConfig {
    pub port: u16,
    /// Items created at startup, in order.
    pub titles: Vec<String>,
}

impl TestServerConfig {
    pub fn with_titles(titles: &[&str]) -> Self {
        Self {
            titles: titles.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FakeItem {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub cache_control: Option<String>,
    pub pragma: Option<String>,
}

/// Canned failure served instead of the real handler.
#[derive(Debug, Clone)]
pub enum Fault {
    Status { status: u16, body: String },
    /// 200 with a body that is not JSON.
    Malformed,
}

#[derive(Default)]
struct FakeData {
    items: Vec<FakeItem>,
    judgments: Vec<(String, String)>,
    requests: Vec<RecordedRequest>,
    faults: HashMap<String, VecDeque<Fault>>,
    /// Next-pair calls answered with `complete: true` regardless of state.
    forced_complete: u32,
}

#[derive(Clone, Default)]
pub struct FakeState {
    inner: Arc<Mutex<FakeData>>,
}

impl FakeState {
    pub fn items(&self) -> Vec<FakeItem> {
        self.inner.lock().items.clone()
    }

    pub fn judgments(&self) -> Vec<(String, String)> {
        self.inner.lock().judgments.clone()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.lock().requests.clone()
    }

    /// Requests whose method and path match, e.g. `("POST", "/api/choose")`.
    pub fn count(&self, method: &str, path: &str) -> usize {
        self.inner
            .lock()
            .requests
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub fn clear_requests(&self) {
        self.inner.lock().requests.clear();
    }

    /// Fails the next request to `path` (one fault per request).
    pub fn fail_next(&self, path: &str, fault: Fault) {
        self.inner
            .lock()
            .faults
            .entry(path.to_string())
            .or_default()
            .push_back(fault);
    }

    pub fn force_complete(&self, times: u32) {
        self.inner.lock().forced_complete = times;
    }

    fn add(&self, title: String, description: String) -> FakeItem {
        let item = FakeItem {
            id: uuid::Uuid::new_v4().simple().to_string(),
            title,
            description,
            rank: None,
        };
        self.inner.lock().items.push(item.clone());
        item
    }
}

pub struct TestServer {
    pub addr: SocketAddr,
    pub state: FakeState,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Base URL the client is configured with.
    pub fn api_url(&self) -> String {
        format!("{}/api", self.url())
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn find_available_port() -> std::io::Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    Ok(addr.port())
}

pub async fn wait_for_server_ready(
    addr: SocketAddr,
    timeout: Duration,
    interval: Duration,
) -> Result<(), ServerStartupError> {
    let start = std::time::Instant::now();

    loop {
        if start.elapsed() > timeout {
            return Err(ServerStartupError::Timeout);
        }

        match tokio::net::TcpStream::connect(addr).await {
            Ok(_) => return Ok(()),
            Err(_) => {
                tokio::time::sleep(interval).await;
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerStartupError {
    #[error("Server failed to start within timeout")]
    Timeout,
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
}

/// Spawns the fake ranking service seeded from `config`.
pub async fn spawn_test_server(config: TestServerConfig) -> Result<TestServer, ServerStartupError> {
    let port = if config.port == 0 {
        find_available_port().await?
    } else {
        config.port
    };

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;

    let state = FakeState::default();
    for title in config.titles {
        state.add(title, String::new());
    }

    let app = Router::new()
        .route("/api/rankings", get(rankings))
        .route("/api/next-pair", get(next_pair))
        .route("/api/entries", post(add_entry))
        .route("/api/items/{id}", delete(delete_item))
        .route("/api/choose", post(choose))
        .route("/api/reset", post(reset))
        .layer(middleware::from_fn_with_state(state.clone(), record))
        .with_state(state.clone());

    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    wait_for_server_ready(
        local_addr,
        Duration::from_secs(STARTUP_WAIT_TIMEOUT_SECS),
        Duration::from_millis(STARTUP_POLL_INTERVAL_MS),
    )
    .await?;

    Ok(TestServer {
        addr: local_addr,
        state,
        _server_handle: server_handle,
        shutdown_tx: Some(shutdown_tx),
    })
}

/// Records the request, then serves a queued fault or the real handler.
async fn record(State(state): State<FakeState>, request: Request, next: Next) -> Response {
    // Borrows of `request` must end before it moves into `next.run`.
    let recorded = {
        let header = |name: HeaderName| {
            request
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        RecordedRequest {
            method: request.method().to_string(),
            path: request.uri().path().to_string(),
            cache_control: header(CACHE_CONTROL),
            pragma: header(PRAGMA),
        }
    };

    let fault = {
        let mut data = state.inner.lock();
        let fault = data
            .faults
            .get_mut(&recorded.path)
            .and_then(VecDeque::pop_front);
        data.requests.push(recorded);
        fault
    };

    match fault {
        Some(Fault::Status { status, body }) => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, body).into_response()
        }
        Some(Fault::Malformed) => (StatusCode::OK, "<html>not json</html>").into_response(),
        None => next.run(request).await,
    }
}

async fn rankings(State(state): State<FakeState>) -> Json<serde_json::Value> {
    Json(json!({ "rankings": state.items() }))
}

async fn next_pair(State(state): State<FakeState>) -> Json<serde_json::Value> {
    let mut data = state.inner.lock();
    if data.forced_complete > 0 {
        data.forced_complete -= 1;
        return Json(json!({ "message": "Ranking complete", "complete": true }));
    }

    let judged = |a: &str, b: &str| {
        data.judgments
            .iter()
            .any(|(w, l)| (w == a && l == b) || (w == b && l == a))
    };
    let mut pair = None;
    'outer: for (i, left) in data.items.iter().enumerate() {
        for right in &data.items[i + 1..] {
            if !judged(&left.id, &right.id) {
                pair = Some((left.clone(), right.clone()));
                break 'outer;
            }
        }
    }

    match pair {
        Some((left, right)) => Json(json!({ "pair": [left, right], "complete": false })),
        None => {
            if data.items.len() >= 2 {
                assign_ranks(&mut data);
            }
            Json(json!({ "message": "Ranking complete", "complete": true }))
        }
    }
}

fn assign_ranks(data: &mut FakeData) {
    let wins = |id: &str| data.judgments.iter().filter(|(w, _)| w == id).count();
    let mut order: Vec<(usize, usize)> = data
        .items
        .iter()
        .enumerate()
        .map(|(idx, item)| (idx, wins(&item.id)))
        .collect();
    order.sort_by_key(|&(_, wins)| std::cmp::Reverse(wins));

    for (position, (idx, _)) in order.into_iter().enumerate() {
        data.items[idx].rank = Some(position as u32 + 1);
    }
}

#[derive(Deserialize)]
struct EntryRequest {
    title: String,
    #[serde(default)]
    description: String,
}

async fn add_entry(
    State(state): State<FakeState>,
    Json(request): Json<EntryRequest>,
) -> Json<serde_json::Value> {
    let entry = state.add(request.title, request.description);
    Json(json!({ "entry": entry }))
}

async fn delete_item(State(state): State<FakeState>, Path(id): Path<String>) -> Response {
    let mut data = state.inner.lock();
    let before = data.items.len();
    data.items.retain(|item| item.id != id);
    if data.items.len() == before {
        return (StatusCode::NOT_FOUND, "Item not found").into_response();
    }
    data.judgments.retain(|(w, l)| *w != id && *l != id);
    Json(json!({ "success": true })).into_response()
}

#[derive(Deserialize)]
struct ChooseRequest {
    winner_id: String,
    loser_id: String,
}

async fn choose(
    State(state): State<FakeState>,
    Json(request): Json<ChooseRequest>,
) -> Json<serde_json::Value> {
    state
        .inner
        .lock()
        .judgments
        .push((request.winner_id, request.loser_id));
    Json(json!({ "success": true }))
}

async fn reset(State(state): State<FakeState>) -> Json<serde_json::Value> {
    let mut data = state.inner.lock();
    data.judgments.clear();
    for item in &mut data.items {
        item.rank = None;
    }
    Json(json!({ "success": true }))
}
