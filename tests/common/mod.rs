#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use todo_api::config::AppConfig;
use todo_api::database::MemoryRepository;
use todo_api::{app, AppState};

pub const TEST_PASSWORD: &str = "correct horse battery staple";

/// In-process application over a fresh in-memory repository
pub struct TestApp {
    router: Router,
    pub repository: Arc<MemoryRepository>,
    pub config: AppConfig,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        let config = AppConfig::development();
        let repository = Arc::new(MemoryRepository::new());
        let state = AppState::new(config.clone(), repository.clone());
        Self {
            router: app(state),
            repository,
            config,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse { status, headers, body }
    }

    pub async fn register(&self, user_name: &str, password: &str) -> TestResponse {
        let body = json!({
            "userName": user_name,
            "email": format!("{}@example.com", user_name),
            "password": password,
        });
        self.request(Method::POST, "/register", None, Some(body)).await
    }

    pub async fn login(&self, user_name: &str, password: &str) -> TestResponse {
        let body = json!({ "userName": user_name, "password": password });
        self.request(Method::POST, "/login", None, Some(body)).await
    }

    /// Register `user_name` and return a bearer token for it
    pub async fn signed_in(&self, user_name: &str) -> String {
        let registered = self.register(user_name, TEST_PASSWORD).await;
        assert_eq!(registered.status, StatusCode::OK, "register failed: {}", registered.body);

        let login = self.login(user_name, TEST_PASSWORD).await;
        assert_eq!(login.status, StatusCode::OK, "login failed: {}", login.body);
        login.body["token"].as_str().unwrap().to_string()
    }

    pub async fn create_item(&self, token: &str, name: &str) -> Value {
        let res = self
            .request(
                Method::POST,
                "/Item",
                Some(token),
                Some(json!({ "name": name, "isComplete": false })),
            )
            .await;
        assert_eq!(res.status, StatusCode::CREATED, "create failed: {}", res.body);
        res.body
    }
}

static SERVER: OnceLock<TestServer> = OnceLock::new();

/// The real binary, spawned once per test executable with the in-memory store
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_todo-api"));
        cmd.env("PORT", port.to_string())
            .env("APP_ENV", "development")
            .env("TODO_STORE", "memory")
            .env("JWT_KEY", "integration-test-signing-key-0123456789abcdef")
            .env("BIND_ADDR", "127.0.0.1")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == reqwest::StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}
