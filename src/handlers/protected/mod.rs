// handlers/protected/mod.rs - Handlers behind the bearer token middleware
//
// Every route here is layered with `middleware::require_token`, which
// injects the caller's `AdminSession`.
pub mod auth;
pub mod config;
pub mod group;
