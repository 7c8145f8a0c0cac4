//! Error types for the database layer

use thiserror::Error;

/// General database error
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    #[error("Database migration error: {0}")]
    MigrationError(String),
}

/// Catalog-specific database errors (restaurants, categories, foods, packages)
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Record not found")]
    NotFound,

    #[error("Record already exists")]
    AlreadyExists,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for CatalogError {
    fn from(error: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_error) = &error {
            if db_error.is_unique_violation() {
                return CatalogError::AlreadyExists;
            }
        }
        CatalogError::DatabaseError(error.to_string())
    }
}

/// Inbox-specific database errors (conversations, messages)
#[derive(Debug, Error)]
pub enum InboxError {
    #[error("Conversation not found")]
    ConversationNotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for InboxError {
    fn from(error: sqlx::Error) -> Self {
        InboxError::DatabaseError(error.to_string())
    }
}
