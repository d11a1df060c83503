//! Shared utilities for integration testing: in-process mock upstreams and a
//! server bound to an ephemeral port.

#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use recipe_importer::{AppConfig, HttpServer, Shutdown};

/// One request received by a mock upstream.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Value,
}

type Responder = dyn Fn(&Recorded, usize) -> (u16, Value) + Send + Sync;

#[derive(Clone)]
struct MockState {
    requests: Arc<Mutex<Vec<Recorded>>>,
    respond: Arc<Responder>,
}

/// A running mock upstream.
pub struct MockUpstream {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockUpstream {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

/// Start a programmable upstream. `respond` gets each request and the number
/// of requests received before it.
pub async fn start_mock<F>(respond: F) -> MockUpstream
where
    F: Fn(&Recorded, usize) -> (u16, Value) + Send + Sync + 'static,
{
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        requests: requests.clone(),
        respond: Arc::new(respond),
    };
    let app = Router::new().fallback(record).with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockUpstream { addr, requests }
}

async fn record(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let recorded = Recorded {
        method,
        path: uri.path().to_string(),
        headers,
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    };
    let mut requests = state.requests.lock().unwrap();
    let (status, body) = (state.respond)(&recorded, requests.len());
    requests.push(recorded);
    (StatusCode::from_u16(status).unwrap(), Json(body))
}

/// A `generateContent` reply carrying `text`.
pub fn gemini_reply(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }]
    })
}

/// A created page.
pub fn notion_page(id: &str) -> Value {
    json!({
        "object": "page",
        "id": id,
        "url": format!("https://www.notion.so/{}", id.replace('-', ""))
    })
}

/// A mock workspace that creates pages and accepts appended blocks.
pub async fn start_notion() -> MockUpstream {
    start_mock(|req, _| {
        if req.method == Method::PATCH {
            (200, json!({"object": "list", "results": []}))
        } else {
            (200, notion_page("5c6a2821-6bb1-4a7e-b6e1-c50111515c3d"))
        }
    })
    .await
}

/// Configuration pointing at the mock upstreams.
pub fn test_config(gemini: &MockUpstream, notion: &MockUpstream) -> AppConfig {
    let mut config = AppConfig::default();
    config.server.bind_address = "127.0.0.1:0".into();
    config.gemini.base_url = gemini.url();
    config.gemini.api_key = Some("test-gemini-key".into());
    config.notion.base_url = notion.url();
    config.notion.token = Some("secret_test".into());
    config.notion.database_id = Some("d9824bdc-8445-4327-be8b-5b47500af6ce".into());
    config.retries.base_delay_ms = 10;
    config.retries.max_delay_ms = 50;
    config
}

/// Start the importer on an ephemeral port.
pub async fn start_server(config: AppConfig) -> (String, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });
    (format!("http://{}", addr), shutdown)
}
