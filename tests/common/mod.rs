#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::{json, Value};

use vinca_api::app::{self, AppState};
use vinca_api::config::AppConfig;
use vinca_api::middleware::SESSION_HEADER;

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: Client,
}

impl TestServer {
    /// Start an in-process server on a free port, backed by in-memory storage.
    pub async fn start() -> Result<Self> {
        Self::start_with(AppConfig {
            bcrypt_cost: 4,
            ..AppConfig::default()
        })
        .await
    }

    pub async fn start_with(config: AppConfig) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;

        let state = AppState::in_memory(&config);
        let router = app::router(Arc::new(app::mux(state, &config)), &config);
        tokio::spawn(app::serve(listener, router, std::future::pending()));

        let server = Self {
            port,
            base_url: format!("http://127.0.0.1:{}", port),
            client: Client::new(),
        };
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path))
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(self.url(path))
    }

    pub fn patch(&self, path: &str) -> RequestBuilder {
        self.client.patch(self.url(path))
    }

    /// Register `username` and log in, returning the session token.
    pub async fn signup(&self, username: &str) -> Result<String> {
        let email = format!("{}@example.com", username.to_lowercase());
        let res = self
            .post("/api/v1/auth/register")
            .json(&json!({"username": username, "email": email, "password": "hunter2"}))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "register failed: {}", res.status());

        let res = self
            .post("/api/v1/auth/login")
            .json(&json!({"email": email, "password": "hunter2"}))
            .send()
            .await?;
        let body: Value = res.json().await?;
        body["content"]["uuid"]
            .as_str()
            .map(str::to_string)
            .context("login response carried no token")
    }
}

/// Attach the session header
pub fn authed(builder: RequestBuilder, token: &str) -> RequestBuilder {
    builder.header(SESSION_HEADER, token)
}

/// Status code plus parsed envelope
pub async fn envelope(builder: RequestBuilder) -> Result<(StatusCode, Value)> {
    let res = builder.send().await?;
    let status = res.status();
    let body = res.json::<Value>().await?;
    Ok((status, body))
}
