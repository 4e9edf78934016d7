//! Mock Boteco backend
//!
//! Serves the five dashboard endpoints from the fixture directory, with an
//! optional static bearer token. Tests can force a status or a payload per
//! endpoint and inspect what was requested.

use axum::{
    Json, Router,
    body::Body,
    extract::{Request, State},
    http::{
        HeaderMap,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use futures::StreamExt;
use serde_json::Value;
use shared::EntityKind;
use std::collections::HashMap;
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{Mutex, RwLock};

pub use axum::http::StatusCode;

/// What an endpoint answers instead of its fixture
#[derive(Debug, Clone)]
enum Override {
    Status(StatusCode),
    Payload(Value),
    /// 200 with the start of a JSON array, then the connection drops
    Truncated,
}

/// Body prefix sent before a truncated response is cut
const TRUNCATED_BODY: &str = r#"[{"mesa_id": 1, "num"#;

/// A request as seen by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub path: String,
    pub authorization: Option<String>,
}

pub struct MockState {
    fixture_dir: PathBuf,
    token: Option<String>,
    health: RwLock<Option<StatusCode>>,
    overrides: RwLock<HashMap<EntityKind, Override>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockState {
    pub fn new(fixture_dir: impl Into<PathBuf>) -> Self {
        Self {
            fixture_dir: fixture_dir.into(),
            token: None,
            health: RwLock::new(None),
            overrides: RwLock::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Require `Authorization: Bearer <token>` on every data endpoint
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Answer `kind`'s endpoint with `status` and an empty body
    pub async fn fail_with(&self, kind: EntityKind, status: StatusCode) {
        self.overrides
            .write()
            .await
            .insert(kind, Override::Status(status));
    }

    /// Answer `kind`'s endpoint with `payload` instead of the fixture
    pub async fn serve_payload(&self, kind: EntityKind, payload: Value) {
        self.overrides
            .write()
            .await
            .insert(kind, Override::Payload(payload));
    }

    /// Start `kind`'s response normally, then drop the connection mid-body
    pub async fn truncate_body(&self, kind: EntityKind) {
        self.overrides
            .write()
            .await
            .insert(kind, Override::Truncated);
    }

    /// Answer `/health` with `status` instead of 200
    pub async fn fail_health(&self, status: StatusCode) {
        *self.health.write().await = Some(status);
    }

    pub async fn clear_overrides(&self) {
        self.overrides.write().await.clear();
        *self.health.write().await = None;
    }

    /// Requests received so far, in arrival order
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }
}

pub fn router(state: Arc<MockState>) -> Router {
    let mut router = Router::new().route("/health", get(health));
    for kind in EntityKind::ALL {
        router = router.route(
            kind.endpoint(),
            get(move |State(state): State<Arc<MockState>>| list_entity(state, kind)),
        );
    }
    router
        .layer(middleware::from_fn_with_state(state.clone(), record_and_authorize))
        .with_state(state)
}

/// Serve on an already bound listener until the process exits
pub async fn run(listener: TcpListener, state: Arc<MockState>) -> Result<(), std::io::Error> {
    axum::serve(listener, router(state)).await
}

/// Serve on an ephemeral local port in the background and return its address
pub async fn spawn(state: Arc<MockState>) -> Result<SocketAddr, std::io::Error> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = run(listener, state).await {
            tracing::error!("Mock server error: {e}");
        }
    });
    Ok(addr)
}

async fn record_and_authorize(
    State(state): State<Arc<MockState>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let authorization = authorization_header(request.headers());
    state.requests.lock().await.push(RecordedRequest {
        path: path.clone(),
        authorization: authorization.clone(),
    });

    if let Some(token) = &state.token
        && path != "/health"
        && authorization.as_deref() != Some(format!("Bearer {token}").as_str())
    {
        tracing::warn!(%path, "Rejected request without valid token");
        return StatusCode::UNAUTHORIZED.into_response();
    }

    next.run(request).await
}

fn authorization_header(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn health(State(state): State<Arc<MockState>>) -> Response {
    match *state.health.read().await {
        Some(status) => status.into_response(),
        None => Json(serde_json::json!({ "status": "ok" })).into_response(),
    }
}

fn truncated_response() -> Response {
    let chunks = [
        Ok(TRUNCATED_BODY),
        Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection dropped")),
    ];
    let stream = futures::stream::iter(chunks).then(|chunk| async move {
        // Let the status line and first chunk reach the client before the cut
        if chunk.is_err() {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        chunk
    });
    (
        StatusCode::OK,
        [(CONTENT_TYPE, "application/json")],
        Body::from_stream(stream),
    )
        .into_response()
}

async fn list_entity(state: Arc<MockState>, kind: EntityKind) -> Response {
    let override_ = state.overrides.read().await.get(&kind).cloned();
    match override_ {
        Some(Override::Status(status)) => return status.into_response(),
        Some(Override::Payload(payload)) => return Json(payload).into_response(),
        Some(Override::Truncated) => return truncated_response(),
        None => {}
    }

    let path = state.fixture_dir.join(kind.fixture_file());
    let loaded = tokio::fs::read(&path)
        .await
        .map_err(|e| e.to_string())
        .and_then(|bytes| serde_json::from_slice::<Value>(&bytes).map_err(|e| e.to_string()));
    match loaded {
        Ok(value) => Json(value).into_response(),
        Err(e) => {
            tracing::error!(path = %path.display(), "Cannot serve fixture: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
