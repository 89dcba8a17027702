use std::collections::HashSet;

use tokio::sync::RwLock;

use super::generate_token;

/// Registry of currently valid bearer tokens.
///
/// Starts empty and lives in memory only, so every token is invalidated when
/// the process restarts. Shared between the auth service and the request
/// middleware through an `Arc`.
#[derive(Debug, Default)]
pub struct TokenStore {
    tokens: RwLock<HashSet<String>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue and remember a fresh token
    pub async fn issue(&self) -> String {
        let token = generate_token();
        self.tokens.write().await.insert(token.clone());
        token
    }

    pub async fn is_valid(&self, token: &str) -> bool {
        self.tokens.read().await.contains(token)
    }

    /// Forget one token. Returns whether it was valid.
    pub async fn revoke(&self, token: &str) -> bool {
        self.tokens.write().await.remove(token)
    }

    /// Forget every token. Returns how many were valid.
    pub async fn revoke_all(&self) -> usize {
        let mut tokens = self.tokens.write().await;
        let count = tokens.len();
        tokens.clear();
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn issue_validate_revoke() {
        let store = TokenStore::new();
        let a = store.issue().await;
        let b = store.issue().await;
        assert!(store.is_valid(&a).await);
        assert!(store.is_valid(&b).await);
        assert!(!store.is_valid("made-up").await);

        assert!(store.revoke(&a).await);
        assert!(!store.revoke(&a).await);
        assert!(!store.is_valid(&a).await);
        assert!(store.is_valid(&b).await);

        assert_eq!(store.revoke_all().await, 1);
        assert!(!store.is_valid(&b).await);
    }
}
