//! Login, logout and credential management for the administrator.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::store::{AuthConfig, AuthState, AuthStore};
use super::tokens::TokenStore;
use super::{generate_password, validate_password_strength, AuthError};
use crate::data::{DataDirectory, GitBootstrap, GitError};

/// Username given to the administrator on first run
pub const DEFAULT_USERNAME: &str = "admin";
const GENERATED_PASSWORD_LENGTH: usize = 20;

const BAD_CREDENTIALS: &str = "The username or password is incorrect";
const BAD_TOKEN: &str = "A valid token is required";
const BAD_PASSWORD: &str = "The password is incorrect";

#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// Upper bound of the random delay added to failed logins
    pub fail_jitter: Duration,
    pub min_password_length: usize,
}

/// Credentials handed out once when the server is first set up
#[derive(Debug, Clone, Serialize)]
pub struct FirstRunCredentials {
    pub username: String,
    pub password: String,
    pub token: String,
}

pub struct AuthService {
    store: AuthStore,
    tokens: Arc<TokenStore>,
    bootstrap: GitBootstrap,
    data: DataDirectory,
    settings: AuthSettings,
    first_run_lock: Mutex<()>,
}

impl AuthService {
    pub fn new(
        store: AuthStore,
        tokens: Arc<TokenStore>,
        bootstrap: GitBootstrap,
        settings: AuthSettings,
    ) -> Self {
        let data = bootstrap.data_dir().clone();
        Self {
            store,
            tokens,
            bootstrap,
            data,
            settings,
            first_run_lock: Mutex::new(()),
        }
    }

    /// Set up the data root (cloning `repo_url`, or starting an empty
    /// repository) and provision fresh administrator credentials.
    ///
    /// A root that was already set up through [`GitBootstrap::setup`] but
    /// never received credentials is kept as is and only gets provisioned.
    /// Any previously issued tokens are revoked.
    pub async fn first_run(
        &self,
        repo_url: Option<&str>,
        branch: Option<&str>,
    ) -> Result<FirstRunCredentials, AuthError> {
        let _guard = self.first_run_lock.lock().await;

        if self.data.is_initialized().await {
            if self.store.read().await? != AuthState::NotConfigured {
                return Err(GitError::AlreadyInitialized.into());
            }
            info!("Data root already set up, provisioning credentials only");
        } else {
            match repo_url {
                Some(url) => self.bootstrap.setup(url, branch).await?,
                None => self.bootstrap.init_empty().await?,
            }
        }

        let password = generate_password(GENERATED_PASSWORD_LENGTH);
        self.store.provision(DEFAULT_USERNAME, &password).await?;
        self.tokens.revoke_all().await;
        let token = self.tokens.issue().await;

        Ok(FirstRunCredentials {
            username: DEFAULT_USERNAME.to_string(),
            password,
            token,
        })
    }

    /// Exchange the administrator's credentials for a token.
    ///
    /// Failures wait out a random delay that was started before the
    /// credentials were compared, so response latency does not reveal which
    /// part of the comparison failed.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let config = self.enabled_config().await?;

        let fail_timer = tokio::time::sleep(self.random_fail_delay());

        let username_matches = username == config.username;
        let password_matches = config.password.verify(password);
        if !(username_matches && password_matches) {
            fail_timer.await;
            warn!("Rejected login attempt");
            return Err(AuthError::Unauthorized(BAD_CREDENTIALS));
        }

        info!("Administrator logged in");
        Ok(self.tokens.issue().await)
    }

    /// Invalidate `token`. Unknown tokens are ignored.
    pub async fn logout(&self, token: &str) {
        if self.tokens.revoke(token).await {
            info!("Administrator logged out");
        }
    }

    pub async fn change_credentials(
        &self,
        token: &str,
        new_username: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        self.require_token(token).await?;
        let config = self.enabled_config().await?;

        if !config.password.verify(old_password) {
            return Err(AuthError::Forbidden(BAD_PASSWORD));
        }
        if new_username.trim().is_empty() {
            return Err(AuthError::InvalidInput("Username must not be empty".to_string()));
        }
        validate_password_strength(new_password, self.settings.min_password_length)?;

        self.store.set_credentials(new_username, new_password).await?;
        info!("Administrator credentials changed");
        Ok(())
    }

    /// Invalidate every outstanding token, including the caller's
    pub async fn revoke_all(&self, token: &str) -> Result<(), AuthError> {
        self.require_token(token).await?;
        let count = self.tokens.revoke_all().await;
        info!("Revoked {} tokens", count);
        Ok(())
    }

    /// Turn logins off permanently and invalidate every token
    pub async fn disable(&self, token: &str, password: &str) -> Result<(), AuthError> {
        self.require_token(token).await?;
        let config = self.enabled_config().await?;

        if !config.password.verify(password) {
            return Err(AuthError::Forbidden(BAD_PASSWORD));
        }

        self.store.disable().await?;
        self.tokens.revoke_all().await;
        Ok(())
    }

    pub async fn require_token(&self, token: &str) -> Result<(), AuthError> {
        if self.tokens.is_valid(token).await {
            Ok(())
        } else {
            Err(AuthError::Unauthorized(BAD_TOKEN))
        }
    }

    async fn enabled_config(&self) -> Result<AuthConfig, AuthError> {
        if !self.data.is_initialized().await {
            return Err(AuthError::ServerNotInitialized);
        }
        match self.store.read().await? {
            AuthState::Enabled(config) => Ok(config),
            AuthState::Disabled => Err(AuthError::AuthDisabled),
            AuthState::NotConfigured => Err(AuthError::ServerNotInitialized),
        }
    }

    fn random_fail_delay(&self) -> Duration {
        let max = self.settings.fail_jitter.as_micros() as u64;
        if max == 0 {
            return Duration::ZERO;
        }
        Duration::from_micros(rand::rng().random_range(0..max))
    }
}
