#![allow(dead_code)]

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::{json, Value};

use fitreview_api::app::{self, AppState, Stores};
use fitreview_api::config::AppConfig;
use fitreview_api::fixtures::Fixture;
use fitreview_api::forms::ProfileLimits;
use fitreview_api::store::FsBlobStore;

/// In-process server on a free port, backed by the in-memory store
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: Client,
    pub stores: Stores,
    pub config: AppConfig,
    _media: tempfile::TempDir,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);
        let media = tempfile::tempdir()?;

        let mut config = AppConfig::development();
        config.api.port = port;
        config.api.enable_request_logging = false;
        config.storage.media_root = media.path().to_path_buf();
        config.storage.public_base_url = format!("{}/media", base_url);
        config.storage.max_image_bytes = 64 * 1024;

        let stores = Stores::memory();
        let blobs = std::sync::Arc::new(FsBlobStore::from_config(&config.storage));
        let state = AppState::new(config.clone(), stores.clone(), blobs);

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
        tokio::spawn(async move {
            if let Err(e) = app::serve(listener, state).await {
                eprintln!("test server stopped: {e:?}");
            }
        });

        let server = Self {
            port,
            base_url,
            client: Client::new(),
            stores,
            config,
            _media: media,
        };
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    /// Server preloaded with fixtures/demo.json
    pub async fn start_seeded() -> Result<Self> {
        let server = Self::start().await?;
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/demo.json");
        Fixture::from_path(&path)?
            .seed(&server.stores, &ProfileLimits::from(&server.config.directory))
            .await?;
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

    pub fn put(&self, path: &str) -> RequestBuilder {
        self.client.put(self.url(path))
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.client.delete(self.url(path))
    }

    /// Signs up and returns (token, user id)
    pub async fn sign_up(&self, email: &str) -> Result<(String, String)> {
        let res = self
            .post("/auth/signup")
            .json(&json!({ "email": email, "password": "password123" }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "signup failed: {}", res.status());
        let body: Value = res.json().await?;
        Ok(token_and_id(&body))
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(String, String)> {
        let res = self
            .post("/auth/login")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());
        let body: Value = res.json().await?;
        Ok(token_and_id(&body))
    }

    /// Signs up and elevates; returns the post-elevation token
    pub async fn sign_up_instructor(&self, email: &str) -> Result<(String, String)> {
        let (token, id) = self.sign_up(email).await?;
        let res = self
            .post("/api/auth/become-instructor")
            .bearer_auth(&token)
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "elevation failed: {}", res.status());
        let body: Value = res.json().await?;
        let (token, _) = token_and_id(&body);
        Ok((token, id))
    }

    /// Id of a seeded instructor by display name
    pub async fn instructor_id(&self, name: &str) -> Result<String> {
        let body: Value = self.get("/instructors").send().await?.json().await?;
        body["data"]["items"]
            .as_array()
            .and_then(|items| items.iter().find(|i| i["name"] == name))
            .and_then(|i| i["id"].as_str())
            .map(str::to_string)
            .with_context(|| format!("instructor {} not listed", name))
    }
}

fn token_and_id(body: &Value) -> (String, String) {
    (
        body["data"]["token"].as_str().unwrap_or_default().to_string(),
        body["data"]["user"]["id"].as_str().unwrap_or_default().to_string(),
    )
}

pub fn names(items: &Value) -> Vec<String> {
    items
        .as_array()
        .map(|a| a.iter().filter_map(|i| i["name"].as_str().map(str::to_string)).collect())
        .unwrap_or_default()
}
