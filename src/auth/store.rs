//! Administrator credentials in the local (non-git) configuration.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{generate_salt, hash_and_salt, AuthError};

/// Name of the local config file inside the private data directory
pub const LOCAL_CONFIG_FILE: &str = "config.local.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordHash {
    pub salt: String,
    pub hash: String,
}

impl PasswordHash {
    pub fn new(password: &str) -> Self {
        let salt = generate_salt();
        let hash = hash_and_salt(&salt, password);
        Self { salt, hash }
    }

    pub fn verify(&self, password: &str) -> bool {
        hash_and_salt(&self.salt, password) == self.hash
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    pub username: String,
    pub password: PasswordHash,
}

/// On-disk layout of the local config. `auth: null` marks authentication as
/// disabled; the key must always be present.
#[derive(Debug, Serialize, Deserialize)]
struct LocalConfig {
    #[serde(deserialize_with = "Option::deserialize")]
    auth: Option<AuthConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// No local config has been written yet
    NotConfigured,
    /// The administrator turned logins off
    Disabled,
    Enabled(AuthConfig),
}

#[derive(Debug, Clone)]
pub struct AuthStore {
    path: PathBuf,
}

impl AuthStore {
    pub fn new(private_dir: impl AsRef<Path>) -> Self {
        Self {
            path: private_dir.as_ref().join(LOCAL_CONFIG_FILE),
        }
    }

    pub async fn read(&self) -> Result<AuthState, AuthError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(AuthState::NotConfigured),
            Err(e) => return Err(self.storage_error(e)),
        };
        let local: LocalConfig = serde_json::from_str(&content).map_err(|source| AuthError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        Ok(match local.auth {
            Some(config) => AuthState::Enabled(config),
            None => AuthState::Disabled,
        })
    }

    /// Replace the credentials. Refuses once authentication was disabled;
    /// only [`AuthStore::provision`] may turn it back on.
    pub async fn set_credentials(&self, username: &str, password: &str) -> Result<(), AuthError> {
        if self.read().await? == AuthState::Disabled {
            return Err(AuthError::AuthDisabled);
        }
        self.write_credentials(username, password).await
    }

    /// Write credentials regardless of the current state. Used by first-run.
    pub async fn provision(&self, username: &str, password: &str) -> Result<(), AuthError> {
        self.write_credentials(username, password).await?;
        info!("Provisioned administrator credentials for '{}'", username);
        Ok(())
    }

    pub async fn disable(&self) -> Result<(), AuthError> {
        self.write(&LocalConfig { auth: None }).await?;
        info!("Authentication disabled");
        Ok(())
    }

    async fn write_credentials(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let config = AuthConfig {
            username: username.to_string(),
            password: PasswordHash::new(password),
        };
        self.write(&LocalConfig { auth: Some(config) }).await
    }

    async fn write(&self, local: &LocalConfig) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.storage_error(e))?;
        }
        let content = serde_json::to_string_pretty(local).map_err(|source| AuthError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        // Staged beside the real file, then renamed over it
        let staging = self.staging_path();
        tokio::fs::write(&staging, content)
            .await
            .map_err(|e| self.storage_error(e))?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(|e| self.storage_error(e))
    }

    fn staging_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }

    fn storage_error(&self, source: std::io::Error) -> AuthError {
        AuthError::Storage {
            path: self.path.clone(),
            source,
        }
    }
}
