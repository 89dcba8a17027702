use std::path::{Path, PathBuf};

use tracing::debug;

use super::{list_subdirectories, read_validated, DataError, GroupInfo, PortfolioConfig};
use crate::schema::{GROUP_INFO, PORTFOLIO_CONFIG};

/// Git metadata directory inside the data root
pub const GIT_DIR: &str = ".git";
pub const CONFIG_FILE: &str = "config.json";
pub const README_FILE: &str = "README.md";
pub const INFO_FILE: &str = "info.json";

/// The on-disk root holding all portfolio data
#[derive(Debug, Clone)]
pub struct DataDirectory {
    root: PathBuf,
}

impl DataDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn group_dir(&self, group_id: &str) -> PathBuf {
        self.root.join(group_id)
    }

    /// Whether the root exists and holds git metadata
    pub async fn is_initialized(&self) -> bool {
        tokio::fs::try_exists(self.root.join(GIT_DIR))
            .await
            .unwrap_or(false)
    }

    /// Whether the root has any entry other than the git metadata
    pub async fn has_entries_besides_git(&self) -> Result<bool, DataError> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(DataError::Io { path: self.root.clone(), source: e }),
        };
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| DataError::Io { path: self.root.clone(), source: e })?
        {
            if entry.file_name() != GIT_DIR {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Whether the root holds recognizable portfolio data: a valid
    /// `config.json`, or at least one group with a valid `info.json`.
    pub async fn contains_data(&self) -> bool {
        let config = read_validated::<PortfolioConfig>(&self.root.join(CONFIG_FILE), &PORTFOLIO_CONFIG).await;
        if config.is_ok() {
            return true;
        }

        let groups = match self.list_group_ids().await {
            Ok(groups) => groups,
            Err(e) => {
                debug!("Unable to list {:?}: {}", self.root, e);
                return false;
            }
        };
        for group_id in groups {
            let info = self.group_dir(&group_id).join(INFO_FILE);
            if read_validated::<GroupInfo>(&info, &GROUP_INFO).await.is_ok() {
                return true;
            }
        }
        false
    }

    /// Every top-level subdirectory except the git metadata, in listing order
    pub async fn list_group_ids(&self) -> Result<Vec<String>, DataError> {
        list_subdirectories(&self.root).await
    }
}
