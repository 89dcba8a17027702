pub mod auth;
pub mod response;

pub use auth::{extract_bearer_token, require_token, AdminSession};
pub use response::{ApiResponse, ApiResult};
