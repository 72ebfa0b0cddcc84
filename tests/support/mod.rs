// Fake payment gateway served on an ephemeral port for client tests.
// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use serde_json::{Value, json};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

// How the fake answers each endpoint.
#[derive(Clone)]
pub struct Script {
    pub token_status: StatusCode,
    pub token_body: Value,
    pub charge_status: StatusCode,
    pub charge_body: Value,
    pub charge_delay: Duration,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            token_status: StatusCode::OK,
            token_body: json!({ "token": "gateway-token" }),
            charge_status: StatusCode::OK,
            charge_body: json!({ "data": { "brcode": "pix-code", "qrcode": "qr-image" } }),
            charge_delay: Duration::ZERO,
        }
    }
}

// What the fake saw, so tests can assert on the outbound calls.
#[derive(Default)]
pub struct Recorded {
    pub token_calls: AtomicUsize,
    pub token_bodies: Mutex<Vec<Value>>,
    pub charge_auth_headers: Mutex<Vec<Option<String>>>,
    pub charge_bodies: Mutex<Vec<Value>>,
}

impl Recorded {
    pub fn token_calls(&self) -> usize {
        self.token_calls.load(Ordering::SeqCst)
    }
}

#[derive(Clone)]
struct FakeState {
    script: Script,
    recorded: Arc<Recorded>,
}

async fn token(
    State(state): State<FakeState>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.recorded.token_calls.fetch_add(1, Ordering::SeqCst);
    state.recorded.token_bodies.lock().unwrap().push(body);
    (state.script.token_status, Json(state.script.token_body.clone()))
}

async fn charge(
    State(state): State<FakeState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let auth = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    state.recorded.charge_auth_headers.lock().unwrap().push(auth);
    state.recorded.charge_bodies.lock().unwrap().push(body);

    if !state.script.charge_delay.is_zero() {
        tokio::time::sleep(state.script.charge_delay).await;
    }
    (state.script.charge_status, Json(state.script.charge_body.clone()))
}

// Start the fake gateway on the current runtime and return its base URL.
pub async fn spawn_gateway(script: Script) -> (String, Arc<Recorded>) {
    let recorded = Arc::new(Recorded::default());
    let app = Router::new()
        .route("/bt/token", post(token))
        .route("/bt/pix", post(charge))
        .with_state(FakeState {
            script,
            recorded: recorded.clone(),
        });

    // Bind to an ephemeral port to avoid collisions with local services.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake gateway failed");
    });

    (format!("http://{addr}"), recorded)
}

// A base URL where nothing is listening.
pub async fn closed_gateway_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    drop(listener);
    format!("http://{addr}")
}

// Answers every call with `status_line` and a body that stops arriving halfway.
pub async fn spawn_stalled_rejection(status_line: &'static str) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut request = [0u8; 8192];
                let _ = socket.read(&mut request).await;
                let head = format!(
                    "HTTP/1.1 {status_line}\r\n\
                     content-type: application/json\r\n\
                     content-length: 64\r\n\r\n{{\"error\""
                );
                let _ = socket.write_all(head.as_bytes()).await;
                // Hold the connection open so the body never completes.
                tokio::time::sleep(Duration::from_secs(5)).await;
            });
        }
    });

    format!("http://{addr}")
}
