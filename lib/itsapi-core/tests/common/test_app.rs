#![allow(
    clippy::missing_errors_doc,
    dead_code,
    missing_docs,
    clippy::expect_used
)]
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Context;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::info;

use itsapi_core::ApiClient;
use itsapi_core::config::{ApiConfig, Credentials};

pub const TOKEN_PATH: &str = "/oauth/token";
pub const SLOW_PATH: &str = "/slow/report";

/// A request received by the mock API.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

impl Captured {
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let query = self.query.as_deref().unwrap_or_default();
        serde_urlencoded::from_str(query).expect("valid query string")
    }
}

#[derive(Debug)]
struct MockState {
    token_hits: AtomicUsize,
    api_hits: AtomicUsize,
    token_forms: Mutex<Vec<String>>,
    expires_in: AtomicU64,
    token_delay_ms: AtomicU64,
    api_delay_ms: AtomicU64,
    token_failure: Mutex<Option<(StatusCode, String)>>,
    api_response: Mutex<(StatusCode, Value)>,
    captured: Mutex<Vec<Captured>>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            token_hits: AtomicUsize::new(0),
            api_hits: AtomicUsize::new(0),
            token_forms: Mutex::default(),
            expires_in: AtomicU64::new(3600),
            token_delay_ms: AtomicU64::new(0),
            api_delay_ms: AtomicU64::new(0),
            token_failure: Mutex::default(),
            api_response: Mutex::new((StatusCode::OK, json!([]))),
            captured: Mutex::default(),
        }
    }
}

type SharedState = Arc<MockState>;

async fn token(State(state): State<SharedState>, body: String) -> Response {
    let hit = state.token_hits.fetch_add(1, Ordering::SeqCst) + 1;
    state
        .token_forms
        .lock()
        .expect("token forms lock")
        .push(body);

    let delay = state.token_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    let failure = state.token_failure.lock().expect("token failure lock").clone();
    if let Some((status, body)) = failure {
        return (status, body).into_response();
    }

    let expires_in = state.expires_in.load(Ordering::SeqCst);
    Json(json!({
        "access_token": format!("tok{hit}"),
        "token_type": "Bearer",
        "expires_in": expires_in,
    }))
    .into_response()
}

async fn api(
    State(state): State<SharedState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state.api_hits.fetch_add(1, Ordering::SeqCst);
    let captured = Captured {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(ToString::to_string),
        authorization: headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string),
        body: serde_json::from_slice(&body).ok(),
    };
    info!(?captured, "mock API hit");
    state.captured.lock().expect("captured lock").push(captured);

    if uri.path() == SLOW_PATH {
        tokio::time::sleep(Duration::from_secs(5)).await;
    }
    let delay = state.api_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    let (status, body) = state.api_response.lock().expect("api response lock").clone();
    (status, Json(body)).into_response()
}

/// An in-process mock of the token endpoint and the ITS API.
#[derive(Debug)]
pub struct TestApp {
    base_url: String,
    state: SharedState,
    server: JoinHandle<()>,
}

impl TestApp {
    pub async fn start() -> anyhow::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .context("bind mock listener")?;
        let address = listener.local_addr().context("mock address")?;
        let base_url = format!("http://{address}");

        let state = SharedState::default();
        let router = Router::new()
            .route(TOKEN_PATH, post(token))
            .fallback(api)
            .with_state(Arc::clone(&state));

        info!(%base_url, "launching mock API");
        let server = tokio::spawn(async move {
            axum::serve(listener, router.into_make_service())
                .await
                .expect("mock API server");
        });

        Ok(Self {
            base_url,
            state,
            server,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new("client", "secret", format!("{}{TOKEN_PATH}", self.base_url))
            .expect("valid credentials")
    }

    pub fn config(&self) -> ApiConfig {
        ApiConfig::new(&self.base_url, self.credentials())
            .expect("valid config")
            .with_program_id("238")
            .with_program_institution_id("5001")
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::builder()
            .with_config(self.config())
            .build()
            .expect("valid client")
    }

    pub fn token_hits(&self) -> usize {
        self.state.token_hits.load(Ordering::SeqCst)
    }

    pub fn api_hits(&self) -> usize {
        self.state.api_hits.load(Ordering::SeqCst)
    }

    pub fn token_forms(&self) -> Vec<String> {
        self.state.token_forms.lock().expect("token forms lock").clone()
    }

    pub fn last_request(&self) -> Option<Captured> {
        self.state.captured.lock().expect("captured lock").last().cloned()
    }

    pub fn with_expires_in(self, seconds: u64) -> Self {
        self.state.expires_in.store(seconds, Ordering::SeqCst);
        self
    }

    pub fn with_token_delay(self, delay: Duration) -> Self {
        let millis = u64::try_from(delay.as_millis()).expect("small delay");
        self.state.token_delay_ms.store(millis, Ordering::SeqCst);
        self
    }

    pub fn with_api_delay(self, delay: Duration) -> Self {
        let millis = u64::try_from(delay.as_millis()).expect("small delay");
        self.state.api_delay_ms.store(millis, Ordering::SeqCst);
        self
    }

    pub fn with_token_failure(self, status: StatusCode, body: impl Into<String>) -> Self {
        *self.state.token_failure.lock().expect("token failure lock") = Some((status, body.into()));
        self
    }

    pub fn with_api_response(self, status: StatusCode, body: Value) -> Self {
        *self.state.api_response.lock().expect("api response lock") = (status, body);
        self
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.server.abort();
    }
}
