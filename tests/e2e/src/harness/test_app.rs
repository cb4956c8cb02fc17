//! Test application
//!
//! Builds the real router over a temporary SQLite database with scripted
//! providers, and drives it in-process with `oneshot`.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use suites_api::{build_router_with_limit, AppState};
use suites_core::{
    ChatProvider, EmbeddingProvider, MaintenanceCopilot, Storage, VectorizationService,
};
use tempfile::TempDir;
use tower::ServiceExt;

use crate::mocks::providers::{ScriptedChat, StaticEmbedder};

/// HTTP response captured as status plus body text
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body)
            .unwrap_or_else(|e| panic!("body is not JSON ({}): {}", e, self.body))
    }
}

/// A wired application over a throwaway database
pub struct TestApp {
    pub storage: Arc<Storage>,
    pub vectorization: Arc<VectorizationService>,
    router: Router,
    _temp_dir: TempDir,
}

impl TestApp {
    /// 2-d app with an empty embedder and a fixed copilot reply
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> TestAppBuilder {
        TestAppBuilder::default()
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Request::builder().method(Method::GET).uri(uri).body(Body::empty()))
            .await
    }

    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> TestResponse {
        self.send(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
        )
        .await
    }

    pub async fn post_form(&self, uri: &str, body: &str) -> TestResponse {
        self.send(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string())),
        )
        .await
    }

    async fn send(&self, request: Result<Request<Body>, axum::http::Error>) -> TestResponse {
        let request = request.expect("valid test request");
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read response body");
        TestResponse {
            status,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Configures dimensions, providers and timeout before wiring
pub struct TestAppBuilder {
    dimensions: usize,
    timeout: Duration,
    concurrency_limit: usize,
    embedder: Arc<dyn EmbeddingProvider>,
    chat: Arc<dyn ChatProvider>,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self {
            dimensions: 2,
            timeout: Duration::from_secs(5),
            concurrency_limit: suites_api::api::DEFAULT_CONCURRENCY_LIMIT,
            embedder: Arc::new(StaticEmbedder::new()),
            chat: Arc::new(ScriptedChat::replying("Please log a ticket with engineering.")),
        }
    }
}

impl TestAppBuilder {
    pub fn dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn concurrency_limit(mut self, limit: usize) -> Self {
        self.concurrency_limit = limit;
        self
    }

    pub fn embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = embedder;
        self
    }

    pub fn chat(mut self, chat: Arc<dyn ChatProvider>) -> Self {
        self.chat = chat;
        self
    }

    pub fn build(self) -> TestApp {
        let temp_dir = TempDir::new().expect("create temp dir");
        let storage = Arc::new(
            Storage::new(Some(temp_dir.path().join("suites.db")), self.dimensions)
                .expect("open test storage"),
        );

        let vectorization = Arc::new(
            VectorizationService::new(self.embedder, storage.clone()).with_timeout(self.timeout),
        );
        let copilot = Arc::new(MaintenanceCopilot::new(self.chat, self.timeout));
        let state = AppState::new(vectorization.clone(), storage.clone(), copilot);

        TestApp {
            storage,
            vectorization,
            router: build_router_with_limit(state, self.concurrency_limit),
            _temp_dir: temp_dir,
        }
    }
}
