//! Shared ordering operations for the catalog collections.
//!
//! Four collections (restaurants, categories, foods, packages) expose the
//! same drag-and-drop reordering contract. The batch update is implemented
//! once here, parameterized by [`OrderedCollection`], instead of once per
//! collection.

use crate::types::{CatalogError, CatalogResult};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::info;

/// Descriptor for a table whose rows carry a `sort_order` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderedCollection {
    Restaurants,
    Categories,
    Foods,
    Packages,
}

impl OrderedCollection {
    pub fn table(&self) -> &'static str {
        match self {
            OrderedCollection::Restaurants => "restaurants",
            OrderedCollection::Categories => "categories",
            OrderedCollection::Foods => "foods",
            OrderedCollection::Packages => "packages",
        }
    }
}

/// One `(id, target order)` pair of a reorder batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderItem {
    pub id: String,
    pub order: i64,
}

/// Repository for the reorder batch operation.
pub struct OrderingRepository {
    pool: SqlitePool,
}

impl OrderingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Apply a reorder batch to one collection.
    ///
    /// The whole batch runs inside a single transaction: either every
    /// referenced record ends up with its paired `sort_order`, or none does.
    /// An unknown id rolls the batch back and surfaces as `NotFound`.
    pub async fn reorder(
        &self,
        collection: OrderedCollection,
        items: &[ReorderItem],
    ) -> CatalogResult<()> {
        if items.is_empty() {
            return Err(CatalogError::InvalidInput(
                "reorder batch must not be empty".to_string(),
            ));
        }

        let query = format!(
            "UPDATE {} SET sort_order = ? WHERE public_id = ?",
            collection.table()
        );

        let mut tx = self.pool.begin().await?;

        for item in items {
            let result = sqlx::query(&query)
                .bind(item.order)
                .bind(&item.id)
                .execute(&mut *tx)
                .await?;

            if result.rows_affected() == 0 {
                tx.rollback().await?;
                return Err(CatalogError::NotFound);
            }
        }

        tx.commit().await?;

        info!(
            collection = collection.table(),
            items = items.len(),
            "applied reorder batch"
        );

        Ok(())
    }
}

/// Next `sort_order` for a new record: one past the current collection
/// maximum, 1 for an empty collection (append-to-end policy).
pub async fn next_sort_order(
    pool: &SqlitePool,
    collection: OrderedCollection,
) -> CatalogResult<i64> {
    let query = format!(
        "SELECT COALESCE(MAX(sort_order), 0) + 1 AS next_order FROM {}",
        collection.table()
    );

    let next: (i64,) = sqlx::query_as(&query).fetch_one(pool).await?;

    Ok(next.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::Row;

    async fn create_test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        crate::migrations::run_migrations(&pool).await.unwrap();
        pool
    }

    async fn insert_category(pool: &SqlitePool, public_id: &str, name: &str, sort_order: i64) {
        sqlx::query(
            "INSERT INTO categories (public_id, name, sort_order, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(public_id)
        .bind(name)
        .bind(sort_order)
        .bind("2024-01-01T00:00:00Z")
        .bind("2024-01-01T00:00:00Z")
        .execute(pool)
        .await
        .unwrap();
    }

    async fn category_order(pool: &SqlitePool) -> Vec<String> {
        sqlx::query("SELECT public_id FROM categories ORDER BY sort_order ASC")
            .fetch_all(pool)
            .await
            .unwrap()
            .into_iter()
            .map(|row| row.get("public_id"))
            .collect()
    }

    #[tokio::test]
    async fn reorder_applies_submitted_ordering() {
        let pool = create_test_pool().await;
        insert_category(&pool, "cat-a", "Soups", 1).await;
        insert_category(&pool, "cat-b", "Salads", 2).await;
        insert_category(&pool, "cat-c", "Mains", 3).await;

        let repo = OrderingRepository::new(pool.clone());
        let items = vec![
            ReorderItem { id: "cat-a".to_string(), order: 3 },
            ReorderItem { id: "cat-b".to_string(), order: 1 },
            ReorderItem { id: "cat-c".to_string(), order: 2 },
        ];

        repo.reorder(OrderedCollection::Categories, &items)
            .await
            .unwrap();

        assert_eq!(category_order(&pool).await, vec!["cat-b", "cat-c", "cat-a"]);
    }

    #[tokio::test]
    async fn reorder_unknown_id_rolls_back_whole_batch() {
        let pool = create_test_pool().await;
        insert_category(&pool, "cat-a", "Soups", 1).await;
        insert_category(&pool, "cat-b", "Salads", 2).await;

        let repo = OrderingRepository::new(pool.clone());
        let items = vec![
            ReorderItem { id: "cat-a".to_string(), order: 2 },
            ReorderItem { id: "missing".to_string(), order: 1 },
        ];

        let result = repo.reorder(OrderedCollection::Categories, &items).await;
        assert!(matches!(result, Err(CatalogError::NotFound)));

        // Nothing moved.
        assert_eq!(category_order(&pool).await, vec!["cat-a", "cat-b"]);
    }

    #[tokio::test]
    async fn reorder_rejects_empty_batch() {
        let pool = create_test_pool().await;
        let repo = OrderingRepository::new(pool);

        let result = repo.reorder(OrderedCollection::Categories, &[]).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn next_sort_order_appends_to_end() {
        let pool = create_test_pool().await;

        assert_eq!(
            next_sort_order(&pool, OrderedCollection::Categories)
                .await
                .unwrap(),
            1
        );

        insert_category(&pool, "cat-a", "Soups", 5).await;

        assert_eq!(
            next_sort_order(&pool, OrderedCollection::Categories)
                .await
                .unwrap(),
            6
        );
    }

    #[tokio::test]
    async fn reorder_targets_only_the_named_collection() {
        let pool = create_test_pool().await;
        insert_category(&pool, "cat-a", "Soups", 1).await;
        sqlx::query(
            "INSERT INTO packages (public_id, name, price_cents, sort_order, created_at, updated_at)
             VALUES ('pkg-a', 'Lunch deal', 999, 1, '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')",
        )
        .execute(&pool)
        .await
        .unwrap();

        let repo = OrderingRepository::new(pool.clone());
        repo.reorder(
            OrderedCollection::Packages,
            &[ReorderItem { id: "pkg-a".to_string(), order: 7 }],
        )
        .await
        .unwrap();

        let category: (i64,) =
            sqlx::query_as("SELECT sort_order FROM categories WHERE public_id = 'cat-a'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(category.0, 1);

        let package: (i64,) =
            sqlx::query_as("SELECT sort_order FROM packages WHERE public_id = 'pkg-a'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(package.0, 7);
    }
}
