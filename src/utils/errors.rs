//! Error handling
//!
//! All error types of the service and their conversion into HTTP responses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Postgres SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";
/// Postgres SQLSTATE for foreign_key_violation
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Main application errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("{message}: {fields:?}")]
    MissingFields {
        message: String,
        fields: Vec<&'static str>,
    },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {message}")]
    Conflict {
        message: String,
        field: &'static str,
        value: String,
    },

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{message}")]
    InvalidChoice {
        message: String,
        allowed: &'static [&'static str],
    },

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("JWT error: {0}")]
    Jwt(String),

    #[error("Hash error: {0}")]
    Hash(String),
}

/// Error body returned by the API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    code: String,
    #[serde(rename = "missingFields", skip_serializing_if = "Option::is_none")]
    missing_fields: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl ErrorResponse {
    fn new(error: &str, message: String, code: &str) -> Self {
        Self {
            error: error.to_string(),
            message,
            code: code.to_string(),
            missing_fields: None,
            field: None,
            value: None,
            details: None,
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(e) if is_unique_violation(e) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Internal(_) | AppError::Hash(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Validation(_)
            | AppError::MissingFields { .. }
            | AppError::BadRequest(_)
            | AppError::InvalidChoice { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) | AppError::Jwt(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
        }
    }

    /// A write referenced a row that no longer exists
    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(self, AppError::Database(e) if has_sqlstate(e, FOREIGN_KEY_VIOLATION))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            AppError::Database(e) => {
                if is_unique_violation(&e) {
                    let constraint = e
                        .as_database_error()
                        .and_then(|d| d.constraint())
                        .unwrap_or("unique")
                        .to_string();
                    tracing::warn!("⚠️ Unique constraint hit at write time: {}", constraint);
                    let mut body = ErrorResponse::new(
                        "Conflict",
                        "A record with the same unique value already exists".to_string(),
                        "CONFLICT",
                    );
                    body.details = Some(json!({ "constraint": constraint }));
                    body
                } else {
                    tracing::error!("❌ Database error: {}", e);
                    ErrorResponse::new("Database Error", e.to_string(), "DB_ERROR")
                }
            }

            AppError::Validation(e) => {
                tracing::debug!("Validation error: {}", e);
                let mut body = ErrorResponse::new(
                    "Validation Error",
                    "The provided data is invalid".to_string(),
                    "VALIDATION_ERROR",
                );
                body.details = Some(json!(e));
                body
            }

            AppError::MissingFields { message, fields } => {
                tracing::debug!("Missing fields: {:?}", fields);
                let mut body = ErrorResponse::new("Bad Request", message, "MISSING_FIELDS");
                body.missing_fields = Some(fields);
                body
            }

            AppError::Unauthorized(msg) => {
                tracing::warn!("🔒 Unauthorized access: {}", msg);
                ErrorResponse::new("Unauthorized", msg, "UNAUTHORIZED")
            }

            AppError::NotFound(msg) => ErrorResponse::new("Not Found", msg, "NOT_FOUND"),

            AppError::Conflict {
                message,
                field,
                value,
            } => {
                tracing::debug!("Conflict on {}: {}", field, value);
                let mut body = ErrorResponse::new("Conflict", message, "CONFLICT");
                body.field = Some(field);
                body.value = Some(value);
                body
            }

            AppError::BadRequest(msg) => ErrorResponse::new("Bad Request", msg, "BAD_REQUEST"),

            AppError::InvalidChoice { message, allowed } => {
                let mut body = ErrorResponse::new("Bad Request", message, "INVALID_CHOICE");
                body.details = Some(json!({ "allowed": allowed }));
                body
            }

            AppError::Internal(msg) => {
                tracing::error!("❌ Internal error: {}", msg);
                ErrorResponse::new("Internal Server Error", msg, "INTERNAL_ERROR")
            }

            AppError::Jwt(msg) => {
                tracing::warn!("🔒 JWT error: {}", msg);
                ErrorResponse::new("JWT Error", msg, "JWT_ERROR")
            }

            AppError::Hash(msg) => {
                tracing::error!("❌ Hash error: {}", msg);
                ErrorResponse::new("Hash Error", msg, "HASH_ERROR")
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    has_sqlstate(error, UNIQUE_VIOLATION)
}

fn has_sqlstate(error: &sqlx::Error, sqlstate: &str) -> bool {
    error
        .as_database_error()
        .and_then(|d| d.code())
        .map_or(false, |code| code == sqlstate)
}

/// Typed result for fallible operations
pub type AppResult<T> = Result<T, AppError>;

/// Not-found error with the resource name the console expects
pub fn not_found_error(resource: &str) -> AppError {
    AppError::NotFound(format!("{} not found!", resource))
}

/// Conflict naming the offending field and its value
pub fn conflict_error(message: &str, field: &'static str, value: &str) -> AppError {
    AppError::Conflict {
        message: message.to_string(),
        field,
        value: value.to_string(),
    }
}

pub fn bad_request_error(message: &str) -> AppError {
    AppError::BadRequest(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_foreign_key_violation_needs_database_error() {
        assert!(!AppError::Database(sqlx::Error::RowNotFound).is_foreign_key_violation());
        assert!(!not_found_error("Vehicle").is_foreign_key_violation());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::MissingFields {
                message: "required".into(),
                fields: vec!["make"],
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            conflict_error("exists", "contact", "0711234567").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(not_found_error("Vehicle").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Jwt("expired".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Database(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_message() {
        match not_found_error("Owner") {
            AppError::NotFound(msg) => assert_eq!(msg, "Owner not found!"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_fields_body() {
        let response = AppError::MissingFields {
            message: "The following fields are required".into(),
            fields: vec!["make", "model"],
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "The following fields are required");
        assert_eq!(body["missingFields"], json!(["make", "model"]));
    }

    #[tokio::test]
    async fn test_conflict_body_names_field() {
        let response = conflict_error(
            "A vehicle with this registration number already exists",
            "registrationNumber",
            "CAB-1234",
        )
        .into_response();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["field"], "registrationNumber");
        assert_eq!(body["value"], "CAB-1234");
    }

    #[tokio::test]
    async fn test_database_error_exposes_raw_message() {
        let response = AppError::Database(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], sqlx::Error::PoolTimedOut.to_string());
    }

    #[tokio::test]
    async fn test_invalid_choice_lists_allowed_values() {
        let response = AppError::InvalidChoice {
            message: "Invalid status".into(),
            allowed: &["Pending", "Completed", "Overdue"],
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["details"]["allowed"], json!(["Pending", "Completed", "Overdue"]));
    }
}
