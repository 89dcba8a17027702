#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde_json::{json, Value};
use tempfile::TempDir;

use folio_api::app::{router, AppState};
use folio_api::config::AppConfig;
use folio_api::data::RepoCloner;

/// Cloner that materializes a fixed file tree instead of running git.
/// Mirrors `FakeCloner` in `src/testing/mod.rs`, which integration tests
/// cannot reach.
#[derive(Default)]
pub struct FakeCloner {
    files: Vec<(String, String)>,
    failure: Option<String>,
}

impl FakeCloner {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_files(files: &[(&str, &str)]) -> Self {
        Self {
            files: files
                .iter()
                .map(|(p, c)| (p.to_string(), c.to_string()))
                .collect(),
            failure: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            files: Vec::new(),
            failure: Some(message.to_string()),
        }
    }
}

#[async_trait]
impl RepoCloner for FakeCloner {
    async fn clone_repo(&self, _url: &str, _branch: Option<&str>, dest: &Path) -> Result<(), String> {
        if let Some(message) = &self.failure {
            return Err(message.clone());
        }
        self.init_repo(dest).await?;
        for (path, content) in &self.files {
            let target = dest.join(path);
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
            }
            std::fs::write(&target, content).map_err(|e| e.to_string())?;
        }
        Ok(())
    }

    async fn init_repo(&self, dest: &Path) -> Result<(), String> {
        std::fs::create_dir_all(dest.join(".git")).map_err(|e| e.to_string())
    }
}

/// In-process server over fresh temporary data and private directories
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: reqwest::Client,
    tmp: TempDir,
}

/// Credentials handed out by first run
pub struct Admin {
    pub username: String,
    pub password: String,
    pub token: String,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        Self::start_with(FakeCloner::empty(), Duration::from_millis(20)).await
    }

    pub async fn start_with(cloner: FakeCloner, fail_jitter: Duration) -> Result<Self> {
        let tmp = tempfile::tempdir().context("failed to create temp dir")?;
        let mut config = AppConfig::with_paths(tmp.path().join("data"), tmp.path().join("private"));
        config.auth.fail_jitter_ms = fail_jitter.as_millis() as u64;

        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test port")?;

        let app = router(AppState::with_cloner(config, Arc::new(cloner)));
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let server = Self {
            port,
            base_url,
            client: reqwest::Client::new(),
            tmp,
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

    pub fn data_path(&self) -> PathBuf {
        self.tmp.path().join("data")
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path))
    }

    pub fn post(&self, path: &str, body: Value) -> RequestBuilder {
        self.client.post(self.url(path)).json(&body)
    }

    pub fn put(&self, path: &str, body: Value) -> RequestBuilder {
        self.client.put(self.url(path)).json(&body)
    }

    /// Run first-run with an empty repository and return the credentials
    pub async fn first_run(&self) -> Result<Admin> {
        let res = self.post("/api/admin/firstrun", json!({})).send().await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "first run failed: {}", res.status());
        let body: Value = res.json().await?;
        let data = &body["data"];
        Ok(Admin {
            username: data["username"].as_str().context("username")?.to_string(),
            password: data["password"].as_str().context("password")?.to_string(),
            token: data["token"].as_str().context("token")?.to_string(),
        })
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<reqwest::Response> {
        Ok(self
            .post(
                "/api/admin/auth/login",
                json!({ "username": username, "password": password }),
            )
            .send()
            .await?)
    }
}
