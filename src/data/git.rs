//! One-shot bootstrap of the data root from a remote git repository.

use std::path::Path;
use std::process::{Output, Stdio};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::{error, info, warn};

use super::DataDirectory;

#[derive(Debug, Error)]
pub enum GitError {
    #[error("Data repo is already set up")]
    AlreadyInitialized,

    #[error("Failed to clone repository: {0}")]
    CloneFailed(String),

    #[error("The repo directory is non-empty, but does not contain portfolio data")]
    InvalidRepositoryContent,

    #[error("Failed to initialize repository: {0}")]
    InitFailed(String),

    #[error("IO error while preparing the data directory: {0}")]
    Io(#[from] std::io::Error),
}

/// External collaborator that materializes a git repository on disk
#[async_trait]
pub trait RepoCloner: Send + Sync {
    /// Clone `url` into `dest`, checking out `branch` or the remote default.
    /// Errors carry a human-readable message.
    async fn clone_repo(&self, url: &str, branch: Option<&str>, dest: &Path) -> Result<(), String>;

    /// Create a fresh, empty repository at `dest`
    async fn init_repo(&self, dest: &Path) -> Result<(), String>;
}

/// [`RepoCloner`] backed by the `git` executable
#[derive(Debug, Clone, Default)]
pub struct GitCli {
    timeout: Option<Duration>,
}

impl GitCli {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    async fn run(&self, command: &mut Command) -> Result<Output, String> {
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Never block on an interactive credential prompt
            .env("GIT_TERMINAL_PROMPT", "0")
            .kill_on_drop(true);

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, command.output())
                .await
                .map_err(|_| format!("git timed out after {:?}", limit))?,
            None => command.output().await,
        }
        .map_err(|e| format!("Failed to execute git: {}", e))?;

        if output.status.success() {
            Ok(output)
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(stderr.trim().to_string())
        }
    }
}

#[async_trait]
impl RepoCloner for GitCli {
    async fn clone_repo(&self, url: &str, branch: Option<&str>, dest: &Path) -> Result<(), String> {
        let mut command = Command::new("git");
        command.arg("clone");
        if let Some(branch) = branch {
            command.args(["--branch", branch]);
        }
        command.arg("--").arg(url).arg(dest);
        self.run(&mut command).await.map(|_| ())
    }

    async fn init_repo(&self, dest: &Path) -> Result<(), String> {
        let mut command = Command::new("git");
        command.arg("init").arg(dest);
        self.run(&mut command).await.map(|_| ())
    }
}

/// Turns a remote repository into the authoritative data root
#[derive(Clone)]
pub struct GitBootstrap {
    dir: DataDirectory,
    cloner: Arc<dyn RepoCloner>,
}

impl GitBootstrap {
    pub fn new(dir: DataDirectory, cloner: Arc<dyn RepoCloner>) -> Self {
        Self { dir, cloner }
    }

    pub fn data_dir(&self) -> &DataDirectory {
        &self.dir
    }

    /// Clone `url` into the data root.
    ///
    /// Only allowed while the root is uninitialized. If the clone has any
    /// content besides `.git`, it must contain recognizable portfolio data;
    /// otherwise the whole root is removed again before failing.
    pub async fn setup(&self, url: &str, branch: Option<&str>) -> Result<(), GitError> {
        if self.dir.is_initialized().await {
            return Err(GitError::AlreadyInitialized);
        }

        let root_existed = tokio::fs::try_exists(self.dir.root()).await?;

        info!("Cloning data repo from {} (branch {:?})", url, branch);
        if let Err(message) = self.cloner.clone_repo(url, branch, self.dir.root()).await {
            error!("Failed to clone data repo: {}", message);
            // Partial clones are removed, a pre-existing root is left alone
            if !root_existed && tokio::fs::try_exists(self.dir.root()).await.unwrap_or(false) {
                self.rollback().await;
            }
            return Err(GitError::CloneFailed(message));
        }

        // Empty repos are fine, they only contain `.git`
        let has_content = match self.dir.has_entries_besides_git().await {
            Ok(has_content) => has_content,
            Err(e) => {
                self.rollback().await;
                return Err(GitError::CloneFailed(e.to_string()));
            }
        };
        if has_content && !self.dir.contains_data().await {
            warn!("Cloned repo does not contain portfolio data, removing it");
            self.rollback().await;
            return Err(GitError::InvalidRepositoryContent);
        }

        info!("Data repo set up at {:?}", self.dir.root());
        Ok(())
    }

    /// Initialize an empty repository as the data root
    pub async fn init_empty(&self) -> Result<(), GitError> {
        if self.dir.is_initialized().await {
            return Err(GitError::AlreadyInitialized);
        }
        self.cloner
            .init_repo(self.dir.root())
            .await
            .map_err(GitError::InitFailed)?;
        info!("Initialized empty data repo at {:?}", self.dir.root());
        Ok(())
    }

    async fn rollback(&self) {
        if let Err(e) = tokio::fs::remove_dir_all(self.dir.root()).await {
            error!("Failed to remove {:?} during rollback: {}", self.dir.root(), e);
        }
    }
}
