//! Repository for menu category data access operations.

use crate::entities::{Category, CreateCategoryRequest, UpdateCategoryRequest};
use crate::repos::ordering::{next_sort_order, OrderedCollection};
use crate::types::{CatalogError, CatalogResult};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::info;

/// Repository for category database operations
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new category, appended to the end of the display order.
    pub async fn create(&self, request: &CreateCategoryRequest) -> CatalogResult<Category> {
        let public_id = cuid2::cuid();
        let now = chrono::Utc::now().to_rfc3339();
        let sort_order = next_sort_order(&self.pool, OrderedCollection::Categories).await?;

        sqlx::query(
            "INSERT INTO categories (public_id, name, sort_order, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&public_id)
        .bind(&request.name)
        .bind(sort_order)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        info!(public_id = %public_id, name = %request.name, sort_order, "created category");

        self.find_by_public_id(&public_id)
            .await?
            .ok_or(CatalogError::NotFound)
    }

    pub async fn find_by_public_id(&self, public_id: &str) -> CatalogResult<Option<Category>> {
        let row = sqlx::query(
            "SELECT id, public_id, name, sort_order, created_at, updated_at
             FROM categories WHERE public_id = ?",
        )
        .bind(public_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| map_row(&row)).transpose().map_err(Into::into)
    }

    /// List all categories in display order.
    pub async fn list(&self) -> CatalogResult<Vec<Category>> {
        let rows = sqlx::query(
            "SELECT id, public_id, name, sort_order, created_at, updated_at
             FROM categories ORDER BY sort_order ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(map_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    pub async fn update(
        &self,
        public_id: &str,
        request: &UpdateCategoryRequest,
    ) -> CatalogResult<Category> {
        let now = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query(
            "UPDATE categories SET name = COALESCE(?, name), updated_at = ? WHERE public_id = ?",
        )
        .bind(&request.name)
        .bind(&now)
        .bind(public_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::NotFound);
        }

        self.find_by_public_id(public_id)
            .await?
            .ok_or(CatalogError::NotFound)
    }

    pub async fn delete(&self, public_id: &str) -> CatalogResult<()> {
        let result = sqlx::query("DELETE FROM categories WHERE public_id = ?")
            .bind(public_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::NotFound);
        }

        info!(public_id, "deleted category");
        Ok(())
    }
}

fn map_row(row: &SqliteRow) -> Result<Category, sqlx::Error> {
    Ok(Category {
        id: row.try_get("id")?,
        public_id: row.try_get("public_id")?,
        name: row.try_get("name")?,
        sort_order: row.try_get("sort_order")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn create_test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        crate::migrations::run_migrations(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn create_assigns_sequential_order() {
        let pool = create_test_pool().await;
        let repo = CategoryRepository::new(pool);

        let soups = repo
            .create(&CreateCategoryRequest { name: "Soups".to_string() })
            .await
            .unwrap();
        let salads = repo
            .create(&CreateCategoryRequest { name: "Salads".to_string() })
            .await
            .unwrap();

        assert_eq!(soups.sort_order, 1);
        assert_eq!(salads.sort_order, 2);
    }

    #[tokio::test]
    async fn rename_keeps_order() {
        let pool = create_test_pool().await;
        let repo = CategoryRepository::new(pool);

        let created = repo
            .create(&CreateCategoryRequest { name: "Soups".to_string() })
            .await
            .unwrap();

        let updated = repo
            .update(
                &created.public_id,
                &UpdateCategoryRequest { name: Some("Starters".to_string()) },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Starters");
        assert_eq!(updated.sort_order, created.sort_order);
    }
}
