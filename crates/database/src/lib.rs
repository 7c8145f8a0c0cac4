//! Mealbox Database Crate
//!
//! This crate provides database functionality for the Mealbox application,
//! including connection management, migrations, and repository implementations.

use mealbox_config::DatabaseConfig;
use sqlx::SqlitePool;

pub mod connection;
pub mod entities;
pub mod migrations;
pub mod repos;
pub mod types;

pub use connection::{prepare_database, DatabaseConnection};
pub use migrations::run_migrations;

// Re-export repositories
pub use repos::{
    next_sort_order, CategoryRepository, ConversationRepository, FoodRepository,
    MessageRepository, OrderedCollection, OrderingRepository, PackageRepository, ReorderItem,
    RestaurantRepository,
};

// Re-export entities
pub use entities::{
    category::{Category, CreateCategoryRequest, UpdateCategoryRequest},
    conversation::{Conversation, ConversationProfile, ConversationSummary},
    food::{CreateFoodRequest, Food, UpdateFoodRequest},
    message::{Direction, Message},
    package::{CreatePackageRequest, Package, UpdatePackageRequest},
    restaurant::{CreateRestaurantRequest, Restaurant, UpdateRestaurantRequest},
};

// Re-export types
pub use types::{
    errors::{CatalogError, DatabaseError, InboxError},
    CatalogResult, DatabaseResult, InboxResult,
};

/// Re-export commonly used types for convenience
pub use sqlx::Pool;

/// Initialize the database with migrations
pub async fn initialize_database(config: &DatabaseConfig) -> DatabaseResult<SqlitePool> {
    let pool = prepare_database(config)
        .await
        .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

    run_migrations(&pool)
        .await
        .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn initialize_database_applies_migrations() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db_url = format!("sqlite://{}", db_path.display());

        let config = DatabaseConfig {
            url: db_url,
            max_connections: 1,
        };

        let pool = initialize_database(&config).await.unwrap();

        let result: (bool,) = sqlx::query_as("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert!(result.0);

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM restaurants")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count.0, 0);
    }
}
