pub mod app;
pub mod auth;
pub mod config;
pub mod data;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod schema;

#[cfg(test)]
pub mod testing;
