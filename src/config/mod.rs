use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub git: GitConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root of the git-backed portfolio data
    pub data_dir: PathBuf,
    /// Local-only data that must never be committed, such as credentials
    pub private_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub fail_jitter_ms: u64,
    pub min_password_length: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitConfig {
    pub clone_timeout_secs: Option<u64>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    /// Development defaults rooted at the given directories
    pub fn with_paths(data_dir: impl Into<PathBuf>, private_dir: impl Into<PathBuf>) -> Self {
        let mut config = Self::development();
        config.storage.data_dir = data_dir.into();
        config.storage.private_dir = private_dir.into();
        config
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Some(v) = env::var("FOLIO_API_PORT").ok().or_else(|| env::var("PORT").ok()) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("CORS_ORIGINS") {
            self.server.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        // Storage overrides
        if let Ok(v) = env::var("DATA_REPO_PATH") {
            self.storage.data_dir = PathBuf::from(v);
        }
        if let Ok(v) = env::var("PRIVATE_DATA_PATH") {
            self.storage.private_dir = PathBuf::from(v);
        }

        // Auth overrides
        if let Ok(v) = env::var("AUTH_FAIL_JITTER_MS") {
            self.auth.fail_jitter_ms = v.parse().unwrap_or(self.auth.fail_jitter_ms);
        }
        if let Ok(v) = env::var("AUTH_MIN_PASSWORD_LENGTH") {
            self.auth.min_password_length = v.parse().unwrap_or(self.auth.min_password_length);
        }

        // Git overrides
        if let Ok(v) = env::var("GIT_CLONE_TIMEOUT_SECS") {
            self.git.clone_timeout_secs = v.parse().ok();
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                port: 5096,
                cors_origins: vec!["http://localhost:5173".to_string()],
            },
            storage: StorageConfig {
                data_dir: PathBuf::from("data"),
                private_dir: PathBuf::from("private-data"),
            },
            auth: AuthConfig {
                fail_jitter_ms: 50,
                min_password_length: 8,
            },
            git: GitConfig {
                clone_timeout_secs: None,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                port: 3000,
                cors_origins: Vec::new(),
            },
            storage: StorageConfig {
                data_dir: PathBuf::from("/data"),
                private_dir: PathBuf::from("/private-data"),
            },
            auth: AuthConfig {
                fail_jitter_ms: 50,
                min_password_length: 10,
            },
            git: GitConfig {
                clone_timeout_secs: Some(120),
            },
        }
    }

    /// Default tracing filter when `RUST_LOG` is unset
    pub fn default_log_filter(&self) -> &'static str {
        match self.environment {
            Environment::Development => "folio_api=debug,tower_http=debug",
            Environment::Production => "folio_api=info,tower_http=info",
        }
    }

    pub fn fail_jitter(&self) -> Duration {
        Duration::from_millis(self.auth.fail_jitter_ms)
    }

    pub fn clone_timeout(&self) -> Option<Duration> {
        self.git.clone_timeout_secs.map(Duration::from_secs)
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.auth.fail_jitter_ms, 50);
        assert_eq!(config.auth.min_password_length, 8);
        assert!(config.git.clone_timeout_secs.is_none());
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert_eq!(config.clone_timeout(), Some(Duration::from_secs(120)));
        assert_eq!(config.default_log_filter(), "folio_api=info,tower_http=info");
    }

    #[test]
    fn test_with_paths() {
        let config = AppConfig::with_paths("/tmp/data", "/tmp/private");
        assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/data"));
        assert_eq!(config.storage.private_dir, PathBuf::from("/tmp/private"));
        assert_eq!(config.fail_jitter(), Duration::from_millis(50));
    }
}
