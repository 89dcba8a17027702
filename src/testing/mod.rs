use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;

use crate::auth::{AuthService, AuthSettings, AuthStore, TokenStore};
use crate::data::{DataDirectory, GitBootstrap, RepoCloner};

/// Temporary data and private directories for a single test
pub struct TestContext {
    tmp: TempDir,
}

impl TestContext {
    /// Context whose data root does not exist yet
    pub fn new() -> Self {
        Self {
            tmp: tempfile::tempdir().expect("failed to create temp dir"),
        }
    }

    /// Context whose data root is an empty, initialized repository
    pub async fn initialized() -> Self {
        let ctx = Self::new();
        FakeCloner::empty()
            .init_repo(&ctx.data_path())
            .await
            .expect("failed to initialize data dir");
        ctx
    }

    pub fn data_path(&self) -> PathBuf {
        self.tmp.path().join("data")
    }

    pub fn private_path(&self) -> PathBuf {
        self.tmp.path().join("private")
    }

    pub fn data_dir(&self) -> DataDirectory {
        DataDirectory::new(self.data_path())
    }

    /// Auth service over this context, using a fake cloner for first-run
    pub fn auth_service(&self, fail_jitter: Duration) -> AuthService {
        let bootstrap = GitBootstrap::new(self.data_dir(), Arc::new(FakeCloner::empty()));
        AuthService::new(
            AuthStore::new(self.private_path()),
            Arc::new(TokenStore::new()),
            bootstrap,
            AuthSettings {
                fail_jitter,
                min_password_length: 8,
            },
        )
    }
}

/// Stand-in for `git` that lays out a fixed tree instead of cloning
pub struct FakeCloner {
    files: Vec<(String, String)>,
    failure: Option<String>,
}

impl FakeCloner {
    pub fn empty() -> Self {
        Self { files: Vec::new(), failure: None }
    }

    pub fn with_files(files: &[(&str, &str)]) -> Self {
        Self {
            files: files.iter().map(|(p, c)| (p.to_string(), c.to_string())).collect(),
            failure: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self { files: Vec::new(), failure: Some(message.to_string()) }
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
