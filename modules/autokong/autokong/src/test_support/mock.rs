//! Mock Kong admin API for integration tests.
//!
//! Records every request it receives and answers with a scripted or default
//! status. Defaults: `204` for `DELETE`, `201` for everything else.
//!
//! # Usage
//! ```ignore
//! let kong = MockKongAdmin::start().await;
//! kong.respond("POST", "/apis/autokong-orders/plugins", 500, "boom");
//! // point the relay at kong.base_url()
//! let calls = kong.recorded_requests().await;
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::{OriginalUri, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use dashmap::DashMap;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

// ---------------------------------------------------------------------------
// Scripted responses
// ---------------------------------------------------------------------------

/// Key for scripted response lookup.
#[derive(Hash, Eq, PartialEq, Clone, Debug)]
pub struct RouteKey {
    pub method: String,
    pub path: String,
}

/// A scripted admin API answer.
#[derive(Clone, Debug)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
}

// ---------------------------------------------------------------------------
// Recording
// ---------------------------------------------------------------------------

/// A captured admin call for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    /// Decoded form body, in wire order.
    pub fn form(&self) -> Vec<(String, String)> {
        serde_urlencoded::from_str(&self.body).expect("admin call body is not form-encoded")
    }

    /// Value of a single form field.
    pub fn form_value(&self, key: &str) -> Option<String> {
        self.form()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

struct SharedState {
    recorded: Mutex<Vec<RecordedRequest>>,
    responses: DashMap<RouteKey, MockResponse>,
}

// ---------------------------------------------------------------------------
// MockKongAdmin
// ---------------------------------------------------------------------------

/// A mock Kong admin server bound to a random local port.
pub struct MockKongAdmin {
    addr: SocketAddr,
    state: Arc<SharedState>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl Drop for MockKongAdmin {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(h) = self.handle.take() {
            h.abort();
        }
    }
}

impl MockKongAdmin {
    /// Start the mock server on `127.0.0.1:0` (random port).
    pub async fn start() -> Self {
        let state = Arc::new(SharedState {
            recorded: Mutex::new(Vec::new()),
            responses: DashMap::new(),
        });
        let app = Router::new()
            .fallback(record_and_respond)
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind mock kong admin");
        let addr = listener.local_addr().expect("failed to get local addr");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .expect("mock server error");
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Script the answer for `method path`.
    pub fn respond(&self, method: &str, path: &str, status: u16, body: impl Into<String>) {
        self.state.responses.insert(
            RouteKey {
                method: method.to_uppercase(),
                path: path.to_owned(),
            },
            MockResponse {
                status,
                body: body.into(),
            },
        );
    }

    /// Snapshot of all recorded requests (oldest first).
    pub async fn recorded_requests(&self) -> Vec<RecordedRequest> {
        self.state.recorded.lock().await.clone()
    }

    /// Clear all recorded requests.
    pub async fn clear_recorded(&self) {
        self.state.recorded.lock().await.clear();
    }
}

/// Base URL of a local port nothing listens on.
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind scratch listener");
    let addr = listener.local_addr().expect("failed to get local addr");
    drop(listener);
    format!("http://{addr}")
}

async fn record_and_respond(
    State(state): State<Arc<SharedState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_owned();
    let content_type = headers
        .get(http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    state.recorded.lock().await.push(RecordedRequest {
        method: method.to_string(),
        path: path.clone(),
        content_type,
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    let key = RouteKey {
        method: method.to_string(),
        path,
    };
    if let Some(scripted) = state.responses.get(&key) {
        let status = StatusCode::from_u16(scripted.status).unwrap_or(StatusCode::OK);
        return (status, scripted.body.clone()).into_response();
    }

    if method == Method::DELETE {
        StatusCode::NO_CONTENT.into_response()
    } else {
        (StatusCode::CREATED, "{}").into_response()
    }
}
