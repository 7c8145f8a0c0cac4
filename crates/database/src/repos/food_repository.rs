//! Repository for food (menu item) data access operations.

use crate::entities::{CreateFoodRequest, Food, UpdateFoodRequest};
use crate::repos::ordering::{next_sort_order, OrderedCollection};
use crate::types::{CatalogError, CatalogResult};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::info;

/// Repository for food database operations
pub struct FoodRepository {
    pool: SqlitePool,
}

impl FoodRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new food, appended to the end of the display order.
    pub async fn create(&self, request: &CreateFoodRequest) -> CatalogResult<Food> {
        let public_id = cuid2::cuid();
        let now = chrono::Utc::now().to_rfc3339();
        let sort_order = next_sort_order(&self.pool, OrderedCollection::Foods).await?;

        sqlx::query(
            "INSERT INTO foods (public_id, category_id, name, description, picture_url,
                                price_cents, calories, sort_order, is_active, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, 1, ?, ?)",
        )
        .bind(&public_id)
        .bind(request.category_id)
        .bind(&request.name)
        .bind(&request.description)
        .bind(&request.picture_url)
        .bind(request.price_cents)
        .bind(request.calories)
        .bind(sort_order)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        info!(public_id = %public_id, name = %request.name, sort_order, "created food");

        self.find_by_public_id(&public_id)
            .await?
            .ok_or(CatalogError::NotFound)
    }

    pub async fn find_by_public_id(&self, public_id: &str) -> CatalogResult<Option<Food>> {
        let row = sqlx::query(
            "SELECT id, public_id, category_id, name, description, picture_url,
                    price_cents, calories, sort_order, is_active, created_at, updated_at
             FROM foods WHERE public_id = ?",
        )
        .bind(public_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| map_row(&row)).transpose().map_err(Into::into)
    }

    /// List foods in display order, optionally scoped to one category.
    pub async fn list(&self, category_id: Option<i64>) -> CatalogResult<Vec<Food>> {
        let rows = match category_id {
            Some(category_id) => {
                sqlx::query(
                    "SELECT id, public_id, category_id, name, description, picture_url,
                            price_cents, calories, sort_order, is_active, created_at, updated_at
                     FROM foods WHERE category_id = ? ORDER BY sort_order ASC",
                )
                .bind(category_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    "SELECT id, public_id, category_id, name, description, picture_url,
                            price_cents, calories, sort_order, is_active, created_at, updated_at
                     FROM foods ORDER BY sort_order ASC",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.iter()
            .map(map_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    pub async fn update(&self, public_id: &str, request: &UpdateFoodRequest) -> CatalogResult<Food> {
        let now = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query(
            "UPDATE foods SET
                name = COALESCE(?, name),
                description = COALESCE(?, description),
                picture_url = COALESCE(?, picture_url),
                price_cents = COALESCE(?, price_cents),
                calories = COALESCE(?, calories),
                is_active = COALESCE(?, is_active),
                updated_at = ?
             WHERE public_id = ?",
        )
        .bind(&request.name)
        .bind(&request.description)
        .bind(&request.picture_url)
        .bind(request.price_cents)
        .bind(request.calories)
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
        let result = sqlx::query("DELETE FROM foods WHERE public_id = ?")
            .bind(public_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::NotFound);
        }

        info!(public_id, "deleted food");
        Ok(())
    }
}

fn map_row(row: &SqliteRow) -> Result<Food, sqlx::Error> {
    Ok(Food {
        id: row.try_get("id")?,
        public_id: row.try_get("public_id")?,
        category_id: row.try_get("category_id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        picture_url: row.try_get("picture_url")?,
        price_cents: row.try_get("price_cents")?,
        calories: row.try_get("calories")?,
        sort_order: row.try_get("sort_order")?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
