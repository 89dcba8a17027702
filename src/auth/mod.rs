//! Single-administrator authentication.

pub mod service;
pub mod store;
pub mod tokens;

use rand::Rng;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::data::GitError;

pub use service::{AuthService, AuthSettings, FirstRunCredentials};
pub use store::{AuthConfig, AuthState, AuthStore, PasswordHash};
pub use tokens::TokenStore;

/// Symbols drawn on by generated passwords
const SYMBOLS: &str = "!@#$%^&*()-_=+[]{};:,.<>/?~";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("Logging in has been disabled by the administrator")]
    AuthDisabled,

    #[error("Server is not initialized")]
    ServerNotInitialized,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to access local config at {path:?}: {source}")]
    Storage {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Local config at {path:?} is malformed: {source}")]
    Corrupt {
        path: std::path::PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Setup(#[from] GitError),
}

/// Hex-encoded SHA-256 of `salt` followed by `password`
pub fn hash_and_salt(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// 32 random bytes, hex-encoded
pub fn generate_salt() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    hex::encode(bytes)
}

/// Opaque bearer token with 256 bits of randomness
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    hex::encode(bytes)
}

/// Check a new password against the strength policy: at least
/// `min_length` characters drawn from at least three of lowercase,
/// uppercase, digits and symbols.
pub fn validate_password_strength(password: &str, min_length: usize) -> Result<(), AuthError> {
    if password.chars().count() < min_length {
        return Err(AuthError::InvalidInput(format!(
            "Password must be at least {} characters",
            min_length
        )));
    }

    let classes = [
        password.chars().any(|c| c.is_lowercase()),
        password.chars().any(|c| c.is_uppercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_alphanumeric()),
    ];
    if classes.iter().filter(|&&present| present).count() < 3 {
        return Err(AuthError::InvalidInput(
            "Password must mix at least three of lowercase, uppercase, digits and symbols".to_string(),
        ));
    }

    Ok(())
}

/// Random password that satisfies [`validate_password_strength`]
pub fn generate_password(length: usize) -> String {
    const LOWER: &str = "abcdefghijkmnopqrstuvwxyz";
    const UPPER: &str = "ABCDEFGHJKLMNPQRSTUVWXYZ";
    const DIGITS: &str = "23456789";

    let mut rng = rand::rng();
    let pools = [LOWER, UPPER, DIGITS, SYMBOLS];
    let all: Vec<char> = pools.iter().flat_map(|p| p.chars()).collect();
    let pick = |pool: &str, rng: &mut rand::rngs::ThreadRng| {
        let chars: Vec<char> = pool.chars().collect();
        chars[rng.random_range(0..chars.len())]
    };

    // One of each class first, then fill and shuffle
    let mut password: Vec<char> = pools.iter().map(|p| pick(p, &mut rng)).collect();
    while password.len() < length {
        password.push(all[rng.random_range(0..all.len())]);
    }
    for i in (1..password.len()).rev() {
        let j = rng.random_range(0..=i);
        password.swap(i, j);
    }
    password.into_iter().collect()
}
