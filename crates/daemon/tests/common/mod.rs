//! Shared test utilities for daemon integration tests
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::Router;
use http::{Request, Response};
use serde_json::Value;
use tower::ServiceExt;
use url::Url;

use codeflow_daemon::auth::AdminTokenGate;
use codeflow_daemon::database::Database;
use codeflow_daemon::generate::{CodeGenerator, CompletionProvider, ProviderError, RateLimiter};
use codeflow_daemon::http_server::{self, Config};
use codeflow_daemon::runner::{CodeRunner, Execution, RunnerError};
use codeflow_daemon::ServiceState;
use ::common::prelude::{OwnerId, Workspace};

pub const ADMIN_TOKEN: &str = "test-token";

/// A fresh in-memory SQLite database with migrations applied
pub async fn memory_database() -> Database {
    Database::connect(&Url::parse("sqlite::memory:").unwrap())
        .await
        .unwrap()
}

pub async fn sqlite_workspace() -> Workspace<Database> {
    Workspace::new(memory_database().await)
}

/// Runner that echoes the submitted code back on stdout
#[derive(Debug, Clone, Default)]
pub struct EchoRunner {
    pub calls: Arc<AtomicUsize>,
}

#[async_trait]
impl CodeRunner for EchoRunner {
    async fn execute(&self, language: &str, code: &str) -> Result<Execution, RunnerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Execution {
            stdout: code.to_string(),
            stderr: String::new(),
            exit_code: 0,
            output: format!("{}: {}", language, code),
        })
    }
}

/// Completion provider with a fixed reply
pub struct CannedProvider {
    pub name: &'static str,
    pub reply: Result<String, u16>,
}

#[async_trait]
impl CompletionProvider for CannedProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn complete(&self, _system: &str, _user: &str) -> Result<String, ProviderError> {
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(status) => Err(ProviderError::Status(*status, "upstream failure".to_string())),
        }
    }
}

pub fn canned_generator() -> CodeGenerator {
    CodeGenerator::new()
        .with_provider(
            CannedProvider {
                name: "openai",
                reply: Err(500),
            },
            RateLimiter::per_minute(10),
        )
        .with_provider(
            CannedProvider {
                name: "gemini",
                reply: Ok("```python\nprint('hi')\n```".to_string()),
            },
            RateLimiter::per_minute(1),
        )
}

/// Full router over in-memory state, guarded by [`ADMIN_TOKEN`]
pub async fn test_router() -> Router {
    let state = ServiceState::with_components(
        memory_database().await,
        AdminTokenGate::new(OwnerId::default(), Some(ADMIN_TOKEN.to_string())),
        EchoRunner::default(),
        canned_generator(),
    );
    let config = Config::new(SocketAddr::from(([127, 0, 0, 1], 0)), tracing::Level::DEBUG);
    http_server::router(config, state)
}

pub fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, format!("Bearer {}", ADMIN_TOKEN))
        .header(http::header::CONTENT_TYPE, "application/json");
    match body {
        Some(body) => builder.body(Body::from(body.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn send(router: &Router, request: Request<Body>) -> (http::StatusCode, Value) {
    let response: Response<Body> = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

/// Serve the test router on an ephemeral local port, returning its base URL
pub async fn serve_test_router() -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = test_router().await;
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Url::parse(&format!("http://{}", addr)).unwrap()
}
