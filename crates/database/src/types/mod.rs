//! Shared types for the database layer

pub mod errors;

pub use errors::{CatalogError, DatabaseError, InboxError};

/// Result type for general database operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Result type for inbox operations
pub type InboxResult<T> = Result<T, InboxError>;
