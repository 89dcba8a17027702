// handlers/mod.rs - Two-tier handler layout
//
// Public (no token) → Protected (bearer token from login or first run)
pub mod public; // Reads, setup and token acquisition
pub mod protected; // Mutations and credential management

use serde::Deserialize;

/// Body of every `PUT .../readme` request
#[derive(Debug, Deserialize)]
pub struct ReadmeBody {
    pub readme: String,
}

/// Body of group and classifier creation requests
#[derive(Debug, Deserialize)]
pub struct CreateBody {
    pub name: String,
    #[serde(default)]
    pub description: String,
}
