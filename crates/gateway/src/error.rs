//! Error types for the gateway layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Gateway error types
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidRequest(_) | GatewayError::AlreadyExists(_) => {
                StatusCode::BAD_REQUEST
            }
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::DatabaseError(_) | GatewayError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Store failures are logged with full detail and reported generically.
        let message = match &self {
            GatewayError::DatabaseError(detail) | GatewayError::InternalError(detail) => {
                tracing::error!(%detail, "request failed");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        let error_response = json!({
            "error": status.as_str(),
            "message": message,
        });

        (status, Json(error_response)).into_response()
    }
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Convert from domain error types
impl From<mealbox_database::CatalogError> for GatewayError {
    fn from(error: mealbox_database::CatalogError) -> Self {
        match error {
            mealbox_database::CatalogError::NotFound => {
                GatewayError::NotFound("Record not found".to_string())
            }
            mealbox_database::CatalogError::AlreadyExists => {
                GatewayError::AlreadyExists("record already exists".to_string())
            }
            mealbox_database::CatalogError::InvalidInput(msg) => GatewayError::InvalidRequest(msg),
            mealbox_database::CatalogError::DatabaseError(msg) => GatewayError::DatabaseError(msg),
        }
    }
}

impl From<mealbox_database::InboxError> for GatewayError {
    fn from(error: mealbox_database::InboxError) -> Self {
        match error {
            mealbox_database::InboxError::ConversationNotFound => {
                GatewayError::NotFound("Conversation not found".to_string())
            }
            mealbox_database::InboxError::DatabaseError(msg) => GatewayError::DatabaseError(msg),
        }
    }
}

impl From<sqlx::Error> for GatewayError {
    fn from(error: sqlx::Error) -> Self {
        GatewayError::DatabaseError(error.to_string())
    }
}
