//! Portfolio data stored on disk inside the git-backed data root.

pub mod classifier;
pub mod config;
pub mod dir;
pub mod git;
pub mod group;
pub mod slug;

use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::schema::{SchemaError, Shape};

pub use classifier::{ClassifierInfo, ClassifierStore};
pub use config::{PortfolioConfig, PortfolioStore};
pub use dir::DataDirectory;
pub use git::{GitBootstrap, GitCli, GitError, RepoCloner};
pub use group::{GroupBrief, GroupInfo, GroupStore};

/// Errors from reading or writing portfolio data
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Data directory is not initialized")]
    NotInitialized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid data in {file}: {source}")]
    Validation {
        file: String,
        #[source]
        source: SchemaError,
    },

    #[error("Malformed JSON in {file}: {source}")]
    Json {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DataError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == ErrorKind::NotFound {
            DataError::NotFound(path.display().to_string())
        } else {
            DataError::Io { path: path.to_path_buf(), source }
        }
    }
}

/// Read a JSON file and validate it against `shape`
pub(crate) async fn read_validated<T: serde::de::DeserializeOwned>(
    path: &Path,
    shape: &Shape,
) -> Result<T, DataError> {
    let text = read_text(path).await?;
    let file = path.display().to_string();

    let value: Value = serde_json::from_str(&text).map_err(|source| {
        tracing::warn!("Malformed JSON in '{}': {}", file, source);
        DataError::Json { file: file.clone(), source }
    })?;

    shape.parse(&value).map_err(|source| {
        tracing::warn!("Error while validating '{}': {}", file, source);
        DataError::Validation { file, source }
    })
}

/// Write `value` as pretty-printed JSON, replacing any existing file
pub(crate) async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), DataError> {
    let content = serde_json::to_string_pretty(value).map_err(|source| DataError::Json {
        file: path.display().to_string(),
        source,
    })?;
    write_text(path, &content).await
}

pub(crate) async fn read_text(path: &Path) -> Result<String, DataError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| DataError::io(path, e))
}

pub(crate) async fn write_text(path: &Path, content: &str) -> Result<(), DataError> {
    tokio::fs::write(path, content)
        .await
        .map_err(|e| DataError::io(path, e))
}

/// Create `path` as a new directory, failing if anything already exists there
pub(crate) async fn create_dir_exclusive(path: &Path, slug: &str) -> Result<(), DataError> {
    match tokio::fs::create_dir(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            Err(DataError::AlreadyExists(slug.to_string()))
        }
        Err(e) => Err(DataError::io(path, e)),
    }
}

/// Create `path` exclusively and fill it with `populate`. If populating
/// fails the new directory is removed again, so the slug stays free.
pub(crate) async fn create_populated_dir<F, Fut>(
    path: &Path,
    slug: &str,
    populate: F,
) -> Result<(), DataError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<(), DataError>>,
{
    create_dir_exclusive(path, slug).await?;
    if let Err(e) = populate().await {
        if let Err(cleanup) = tokio::fs::remove_dir_all(path).await {
            tracing::error!("Failed to remove partially created {:?}: {}", path, cleanup);
        }
        return Err(e);
    }
    Ok(())
}

/// Names of the subdirectories of `path`, in listing order
pub(crate) async fn list_subdirectories(path: &Path) -> Result<Vec<String>, DataError> {
    let mut entries = match tokio::fs::read_dir(path).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(DataError::io(path, e)),
    };

    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(|e| DataError::io(path, e))? {
        let is_dir = entry
            .file_type()
            .await
            .map(|t| t.is_dir())
            .unwrap_or(false);
        if !is_dir {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if name != dir::GIT_DIR {
                names.push(name.to_string());
            }
        }
    }
    Ok(names)
}

/// Initial `README.md` for a newly created group or classifier
pub(crate) fn seed_readme(name: &str, description: &str) -> String {
    let mut readme = format!("# {}\n", name);
    if !description.is_empty() {
        readme.push_str(&format!("\n{}\n", description));
    }
    readme
}

/// A random `#rrggbb` color
pub(crate) fn random_color() -> String {
    use rand::Rng;
    let rgb: u32 = rand::rng().random_range(0..=0xff_ff_ff);
    format!("#{:06x}", rgb)
}
