//! Shared helpers for tests that exercise real HTTP clients.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Router,
};

use crate::config::Config;

/// Config with harmless values; tests override the fields they care about.
pub fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/test".to_string(),
        db_max_connections: 1,
        supabase_url: "http://localhost:54321".to_string(),
        supabase_service_key: "service-key".to_string(),
        ai_gateway_url: "http://localhost:9/v1/chat/completions".to_string(),
        ai_gateway_api_key: "gateway-key".to_string(),
        ai_model: "google/gemini-2.5-flash".to_string(),
        ai_timeout_secs: 5,
        completion_max_retries: 0,
        port: 0,
        rust_log: "debug".to_string(),
    }
}

struct StubState {
    status: StatusCode,
    body: String,
    hits: AtomicUsize,
    last_headers: Mutex<Option<HeaderMap>>,
}

/// Local HTTP server answering every request with one scripted status and body.
pub struct StubServer {
    pub url: String,
    state: Arc<StubState>,
}

impl StubServer {
    pub async fn start(status: u16, body: &str) -> Self {
        let state = Arc::new(StubState {
            status: StatusCode::from_u16(status).unwrap(),
            body: body.to_string(),
            hits: AtomicUsize::new(0),
            last_headers: Mutex::new(None),
        });

        let app = Router::new()
            .fallback(reply)
            .with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{addr}"),
            state,
        }
    }

    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    /// Value of `name` on the most recent request, if any.
    pub fn last_header(&self, name: &str) -> Option<String> {
        self.state
            .last_headers
            .lock()
            .unwrap()
            .as_ref()
            .and_then(|h| h.get(name))
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    }
}

async fn reply(State(state): State<Arc<StubState>>, headers: HeaderMap) -> (StatusCode, String) {
    state.hits.fetch_add(1, Ordering::SeqCst);
    *state.last_headers.lock().unwrap() = Some(headers);
    (state.status, state.body.clone())
}

/// An address nothing listens on: bound once, then released.
pub async fn closed_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}
