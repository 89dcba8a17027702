//! Top-level `config.json` and `README.md` of the data root.

use serde::{Deserialize, Serialize};

use super::dir::{CONFIG_FILE, README_FILE};
use super::{read_text, read_validated, write_json, write_text, DataDirectory, DataError};
use crate::schema::PORTFOLIO_CONFIG;

/// Main configuration for the portfolio
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioConfig {
    /// Name of the person the site is about
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct PortfolioStore {
    dir: DataDirectory,
}

impl PortfolioStore {
    pub fn new(dir: DataDirectory) -> Self {
        Self { dir }
    }

    pub async fn get_config(&self) -> Result<PortfolioConfig, DataError> {
        read_validated(&self.dir.root().join(CONFIG_FILE), &PORTFOLIO_CONFIG).await
    }

    pub async fn set_config(&self, config: &PortfolioConfig) -> Result<(), DataError> {
        if !self.dir.is_initialized().await {
            return Err(DataError::NotInitialized);
        }
        write_json(&self.dir.root().join(CONFIG_FILE), config).await
    }

    pub async fn get_readme(&self) -> Result<String, DataError> {
        read_text(&self.dir.root().join(README_FILE)).await
    }

    pub async fn set_readme(&self, readme: &str) -> Result<(), DataError> {
        if !self.dir.is_initialized().await {
            return Err(DataError::NotInitialized);
        }
        write_text(&self.dir.root().join(README_FILE), readme).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestContext;

    #[tokio::test]
    async fn config_makes_root_contain_data() {
        let ctx = TestContext::initialized().await;
        let store = PortfolioStore::new(ctx.data_dir());
        assert!(!ctx.data_dir().contains_data().await);

        store.set_config(&PortfolioConfig { name: "Maddy".into() }).await.unwrap();
        assert_eq!(store.get_config().await.unwrap().name, "Maddy");
        assert!(ctx.data_dir().contains_data().await);
    }

    #[tokio::test]
    async fn writes_require_initialized_root() {
        let ctx = TestContext::new();
        let store = PortfolioStore::new(ctx.data_dir());
        let err = store.set_readme("# Hi\n").await.unwrap_err();
        assert!(matches!(err, DataError::NotInitialized));
    }
}
