//! Repository for restaurant data access operations.

use crate::entities::{CreateRestaurantRequest, Restaurant, UpdateRestaurantRequest};
use crate::repos::ordering::{next_sort_order, OrderedCollection};
use crate::types::{CatalogError, CatalogResult};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::info;

/// Repository for restaurant database operations
pub struct RestaurantRepository {
    pool: SqlitePool,
}

impl RestaurantRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new restaurant, appended to the end of the display order.
    pub async fn create(&self, request: &CreateRestaurantRequest) -> CatalogResult<Restaurant> {
        let public_id = cuid2::cuid();
        let now = chrono::Utc::now().to_rfc3339();
        let sort_order = next_sort_order(&self.pool, OrderedCollection::Restaurants).await?;

        sqlx::query(
            "INSERT INTO restaurants (public_id, name, address, picture_url, sort_order, is_active, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, 1, ?, ?)",
        )
        .bind(&public_id)
        .bind(&request.name)
        .bind(&request.address)
        .bind(&request.picture_url)
        .bind(sort_order)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        info!(public_id = %public_id, name = %request.name, sort_order, "created restaurant");

        self.find_by_public_id(&public_id)
            .await?
            .ok_or(CatalogError::NotFound)
    }

    pub async fn find_by_public_id(&self, public_id: &str) -> CatalogResult<Option<Restaurant>> {
        let row = sqlx::query(
            "SELECT id, public_id, name, address, picture_url, sort_order, is_active, created_at, updated_at
             FROM restaurants WHERE public_id = ?",
        )
        .bind(public_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| map_row(&row)).transpose().map_err(Into::into)
    }

    /// List all restaurants in display order.
    pub async fn list(&self) -> CatalogResult<Vec<Restaurant>> {
        let rows = sqlx::query(
            "SELECT id, public_id, name, address, picture_url, sort_order, is_active, created_at, updated_at
             FROM restaurants ORDER BY sort_order ASC",
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
        request: &UpdateRestaurantRequest,
    ) -> CatalogResult<Restaurant> {
        let now = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query(
            "UPDATE restaurants SET
                name = COALESCE(?, name),
                address = COALESCE(?, address),
                picture_url = COALESCE(?, picture_url),
                is_active = COALESCE(?, is_active),
                updated_at = ?
             WHERE public_id = ?",
        )
        .bind(&request.name)
        .bind(&request.address)
        .bind(&request.picture_url)
        .bind(request.is_active)
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
        let result = sqlx::query("DELETE FROM restaurants WHERE public_id = ?")
            .bind(public_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::NotFound);
        }

        info!(public_id, "deleted restaurant");
        Ok(())
    }
}

fn map_row(row: &SqliteRow) -> Result<Restaurant, sqlx::Error> {
    Ok(Restaurant {
        id: row.try_get("id")?,
        public_id: row.try_get("public_id")?,
        name: row.try_get("name")?,
        address: row.try_get("address")?,
        picture_url: row.try_get("picture_url")?,
        sort_order: row.try_get("sort_order")?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
