#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use webtoon_api::app::{self, AppState};
use webtoon_api::auth::{Claims, TokenVerifier};
use webtoon_api::config::AppConfig;
use webtoon_api::database::MemoryWebtoonStore;

pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
    tokens: TokenVerifier,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Token that verifies for the next hour
    pub fn token(&self) -> String {
        self.tokens
            .issue(&Claims::new("integration-test", chrono::Duration::hours(1)))
            .expect("issue token")
    }

    pub fn expired_token(&self) -> String {
        self.tokens
            .issue(&Claims::new("integration-test", chrono::Duration::hours(-1)))
            .expect("issue token")
    }

    pub async fn create(&self, body: &Value) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(self.url("/api/webtoons"))
            .bearer_auth(self.token())
            .json(body)
            .send()
            .await?)
    }

    /// Create a webtoon and return its assigned id
    pub async fn create_ok(&self, title: &str) -> Result<String> {
        let res = self.create(&sample(title)).await?;
        anyhow::ensure!(res.status() == 201, "create returned {}", res.status());
        let body = res.json::<Value>().await?;
        body["id"]
            .as_str()
            .map(str::to_string)
            .context("created webtoon has no id")
    }
}

pub fn sample(title: &str) -> Value {
    json!({
        "title": title,
        "description": "B",
        "author": "C",
        "characters": ["x", "y"]
    })
}

/// Start the router on a free port with an in-memory store
pub async fn spawn_server() -> Result<TestServer> {
    spawn_with(AppConfig::development()).await
}

pub async fn spawn_with(config: AppConfig) -> Result<TestServer> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = TcpListener::bind(("127.0.0.1", port)).await?;

    let state = AppState::new(Arc::new(MemoryWebtoonStore::new()), &config)?;
    let router = app::router(state, &config);
    tokio::spawn(app::serve(listener, router, std::future::pending()));

    Ok(TestServer {
        base_url: format!("http://127.0.0.1:{}", port),
        client: reqwest::Client::new(),
        tokens: TokenVerifier::new(&config.security.jwt_secret)?,
    })
}
