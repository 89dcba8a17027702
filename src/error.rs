// HTTP API Error Types
use axum::{response::IntoResponse, http::StatusCode, Json};
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::auth::AuthError;
use crate::data::{DataError, GitError};
use crate::schema::SchemaError;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    ValidationError {
        message: String,
        field_errors: Option<HashMap<String, String>>,
    },

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error
    InternalServerError(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::ValidationError { .. } => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::InternalServerError(_) => 500,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::ValidationError { message, .. } => message,
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::ValidationError { message, field_errors } => {
                let mut response = json!({
                    "error": true,
                    "message": message,
                    "code": "VALIDATION_ERROR"
                });

                if let Some(field_errors) = field_errors {
                    response["field_errors"] = json!(field_errors);
                }

                response
            }
            _ => {
                json!({
                    "error": true,
                    "message": self.message(),
                    "code": self.error_code()
                })
            }
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::ValidationError { .. } => "VALIDATION_ERROR",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation_error(
        message: impl Into<String>,
        field_errors: Option<HashMap<String, String>>,
    ) -> Self {
        ApiError::ValidationError {
            message: message.into(),
            field_errors,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }
}

impl From<SchemaError> for ApiError {
    fn from(err: SchemaError) -> Self {
        let mut field_errors = HashMap::new();
        field_errors.insert(err.path.clone(), format!("Expected {}", err.expected));
        ApiError::validation_error("Request body does not match the expected shape", Some(field_errors))
    }
}

impl From<DataError> for ApiError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::NotInitialized => ApiError::bad_request("Server is not initialized"),
            DataError::NotFound(_) => ApiError::not_found("Not found"),
            DataError::AlreadyExists(id) => {
                ApiError::bad_request(format!("'{}' already exists", id))
            }
            DataError::InvalidInput(msg) => ApiError::bad_request(msg),
            DataError::Validation { file, source } => {
                tracing::error!("Invalid data in {}: {}", file, source);
                let mut field_errors = HashMap::new();
                field_errors.insert(source.path, format!("Expected {}", source.expected));
                ApiError::validation_error("Stored data is invalid", Some(field_errors))
            }
            DataError::Json { file, source } => {
                tracing::error!("Malformed JSON in {}: {}", file, source);
                let mut field_errors = HashMap::new();
                field_errors.insert(
                    "(root)".to_string(),
                    format!("Expected valid JSON ({})", source),
                );
                ApiError::validation_error("Stored data is invalid", Some(field_errors))
            }
            DataError::Io { path, source } => {
                // Don't expose filesystem details to clients
                tracing::error!("IO error at {:?}: {}", path, source);
                ApiError::internal_server_error("An error occurred while accessing data")
            }
        }
    }
}

impl From<GitError> for ApiError {
    fn from(err: GitError) -> Self {
        match err {
            GitError::AlreadyInitialized => ApiError::forbidden(err.to_string()),
            GitError::CloneFailed(_) | GitError::InvalidRepositoryContent => {
                ApiError::bad_request(err.to_string())
            }
            GitError::InitFailed(_) | GitError::Io(_) => {
                tracing::error!("Repository setup error: {}", err);
                ApiError::internal_server_error("Failed to set up the data repository")
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthorized(msg) => ApiError::unauthorized(msg),
            AuthError::Forbidden(msg) => ApiError::forbidden(msg),
            AuthError::AuthDisabled => ApiError::forbidden(err.to_string()),
            AuthError::ServerNotInitialized => ApiError::bad_request(err.to_string()),
            AuthError::InvalidInput(msg) => ApiError::bad_request(msg),
            AuthError::Setup(git) => git.into(),
            AuthError::Storage { .. } | AuthError::Corrupt { .. } => {
                tracing::error!("Local config error: {}", err);
                ApiError::internal_server_error("An error occurred while accessing credentials")
            }
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_setup_errors() {
        assert_eq!(ApiError::from(GitError::AlreadyInitialized).status_code(), 403);
        assert_eq!(ApiError::from(GitError::CloneFailed("nope".into())).status_code(), 400);
        assert_eq!(ApiError::from(GitError::InvalidRepositoryContent).status_code(), 400);
    }

    #[test]
    fn maps_auth_errors() {
        assert_eq!(ApiError::from(AuthError::Unauthorized("no")).status_code(), 401);
        assert_eq!(ApiError::from(AuthError::Forbidden("no")).status_code(), 403);
        assert_eq!(ApiError::from(AuthError::AuthDisabled).status_code(), 403);
        assert_eq!(ApiError::from(AuthError::ServerNotInitialized).status_code(), 400);
        assert_eq!(ApiError::from(AuthError::InvalidInput("weak".into())).status_code(), 400);
    }

    #[test]
    fn maps_data_errors() {
        assert_eq!(ApiError::from(DataError::AlreadyExists("g".into())).status_code(), 400);
        assert_eq!(ApiError::from(DataError::NotFound("g".into())).status_code(), 404);
        assert_eq!(ApiError::from(DataError::NotInitialized).status_code(), 400);
    }

    #[test]
    fn malformed_stored_json_is_a_validation_error() {
        let source = serde_json::from_str::<Value>("{ nope").unwrap_err();
        let err = ApiError::from(DataError::Json {
            file: "projects/info.json".into(),
            source,
        });
        assert_eq!(err.status_code(), 400);
        let body = err.to_json();
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["field_errors"]["(root)"]
            .as_str()
            .is_some_and(|msg| msg.starts_with("Expected valid JSON")));
    }

    #[test]
    fn schema_errors_list_field() {
        let err = ApiError::from(SchemaError {
            path: "associations[0].display".into(),
            expected: "one of chip, card".into(),
        });
        let body = err.to_json();
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["field_errors"]["associations[0].display"], "Expected one of chip, card");
    }
}
