//! Repository for meal package data access operations.

use crate::entities::{CreatePackageRequest, Package, UpdatePackageRequest};
use crate::repos::ordering::{next_sort_order, OrderedCollection};
use crate::types::{CatalogError, CatalogResult};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::info;

/// Repository for package database operations
pub struct PackageRepository {
    pool: SqlitePool,
}

impl PackageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new package, appended to the end of the display order.
    pub async fn create(&self, request: &CreatePackageRequest) -> CatalogResult<Package> {
        let public_id = cuid2::cuid();
        let now = chrono::Utc::now().to_rfc3339();
        let sort_order = next_sort_order(&self.pool, OrderedCollection::Packages).await?;

        sqlx::query(
            "INSERT INTO packages (public_id, name, description, picture_url, price_cents, sort_order, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&public_id)
        .bind(&request.name)
        .bind(&request.description)
        .bind(&request.picture_url)
        .bind(request.price_cents)
        .bind(sort_order)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        info!(public_id = %public_id, name = %request.name, sort_order, "created package");

        self.find_by_public_id(&public_id)
            .await?
            .ok_or(CatalogError::NotFound)
    }

    pub async fn find_by_public_id(&self, public_id: &str) -> CatalogResult<Option<Package>> {
        let row = sqlx::query(
            "SELECT id, public_id, name, description, picture_url, price_cents, sort_order, created_at, updated_at
             FROM packages WHERE public_id = ?",
        )
        .bind(public_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| map_row(&row)).transpose().map_err(Into::into)
    }

    /// List all packages in display order.
    pub async fn list(&self) -> CatalogResult<Vec<Package>> {
        let rows = sqlx::query(
            "SELECT id, public_id, name, description, picture_url, price_cents, sort_order, created_at, updated_at
             FROM packages ORDER BY sort_order ASC",
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
        request: &UpdatePackageRequest,
    ) -> CatalogResult<Package> {
        let now = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query(
            "UPDATE packages SET
                name = COALESCE(?, name),
                description = COALESCE(?, description),
                picture_url = COALESCE(?, picture_url),
                price_cents = COALESCE(?, price_cents),
                updated_at = ?
             WHERE public_id = ?",
        )
        .bind(&request.name)
        .bind(&request.description)
        .bind(&request.picture_url)
        .bind(request.price_cents)
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
        let result = sqlx::query("DELETE FROM packages WHERE public_id = ?")
            .bind(public_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::NotFound);
        }

        info!(public_id, "deleted package");
        Ok(())
    }
}

fn map_row(row: &SqliteRow) -> Result<Package, sqlx::Error> {
    Ok(Package {
        id: row.try_get("id")?,
        public_id: row.try_get("public_id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        picture_url: row.try_get("picture_url")?,
        price_cents: row.try_get("price_cents")?,
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
    async fn create_then_update_price() {
        let pool = create_test_pool().await;
        let repo = PackageRepository::new(pool);

        let created = repo
            .create(&CreatePackageRequest {
                name: "Lunch deal".to_string(),
                description: Some("Soup + main".to_string()),
                picture_url: None,
                price_cents: 1500,
            })
            .await
            .unwrap();
        assert_eq!(created.sort_order, 1);

        let updated = repo
            .update(
                &created.public_id,
                &UpdatePackageRequest {
                    price_cents: Some(1700),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.price_cents, 1700);
        assert_eq!(updated.description.as_deref(), Some("Soup + main"));
    }
}
