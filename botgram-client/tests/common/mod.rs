//! Shared test fixtures: a scripted local API server that plays back a fixed
//! sequence of responses and records every request body it saw.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

/// Plays back a scripted sequence of `(status, body)` responses; the last
/// entry repeats once the rest of the script is consumed. An empty script
/// answers every request with an empty successful batch.
pub struct ScriptedApi {
    responses: Mutex<VecDeque<(u16, Value)>>,
    hits: AtomicU32,
    bodies: Mutex<Vec<Value>>,
}

impl ScriptedApi {
    pub fn new(responses: Vec<(u16, Value)>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into_iter().collect()),
            hits: AtomicU32::new(0),
            bodies: Mutex::new(Vec::new()),
        })
    }

    pub fn hits(&self) -> u32 {
        self.hits.load(Ordering::SeqCst)
    }

    /// Request bodies in arrival order.
    pub fn bodies(&self) -> Vec<Value> {
        self.bodies.lock().unwrap().clone()
    }

    fn next_response(&self) -> (u16, Value) {
        let mut queue = self.responses.lock().unwrap();
        if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue
                .front()
                .cloned()
                .unwrap_or((200, json!({"ok": true, "result": []})))
        }
    }
}

async fn respond(
    State(api): State<Arc<ScriptedApi>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    api.hits.fetch_add(1, Ordering::SeqCst);
    api.bodies.lock().unwrap().push(body);
    let (status, value) = api.next_response();
    (StatusCode::from_u16(status).unwrap(), Json(value))
}

/// Serves the script at `path` on an ephemeral port; returns the base URL.
pub async fn spawn_scripted(path: &str, api: Arc<ScriptedApi>) -> String {
    let app = Router::new().route(path, post(respond)).with_state(api);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Serves a route at `path` that sleeps for `delay` before answering, to
/// exercise the per-attempt timeout.
#[allow(dead_code)]
pub async fn spawn_slow(path: &str, delay: Duration) -> String {
    let app = Router::new().route(
        path,
        post(move || async move {
            tokio::time::sleep(delay).await;
            Json(json!({"ok": true, "result": []}))
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Answers promptly with response headers and a few body bytes, then stalls
/// for `delay` without completing the body, so the per-attempt deadline fires
/// while the body is being read rather than while connecting.
#[allow(dead_code)]
pub async fn spawn_stalled_body(delay: Duration) -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let (mut socket, _) = match listener.accept().await {
                Ok(conn) => conn,
                Err(_) => break,
            };
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let head = "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\n\
                            content-length: 64\r\n\r\n{\"ok\":";
                let _ = socket.write_all(head.as_bytes()).await;
                tokio::time::sleep(delay).await;
            });
        }
    });
    format!("http://{}", addr)
}

/// A minimal message-bearing update as the API would deliver it.
#[allow(dead_code)]
pub fn update_json(id: i64, text: &str) -> Value {
    json!({
        "update_id": id,
        "message": {
            "message_id": id,
            "chat": {"id": 1, "type": "private"},
            "date": 1_700_000_000,
            "text": text
        }
    })
}
