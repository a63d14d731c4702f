use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::common::FieldCount;
use crate::dto::inventory_dto::InventoryInput;
use crate::models::inventory::InventoryItem;
use crate::utils::errors::AppError;

pub struct InventoryRepository {
    pool: PgPool,
}

impl InventoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: &InventoryInput) -> Result<InventoryItem, AppError> {
        let now = Utc::now();
        let item = sqlx::query_as::<_, InventoryItem>(
            r#"
            INSERT INTO inventory_items (
                id, item_code, name, category, quantity, unit_price, reorder_level, supplier,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.item_code)
        .bind(&input.name)
        .bind(&input.category)
        .bind(input.quantity)
        .bind(input.unit_price)
        .bind(input.reorder_level)
        .bind(&input.supplier)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(item)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<InventoryItem>, AppError> {
        let item = sqlx::query_as::<_, InventoryItem>("SELECT * FROM inventory_items WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    pub async fn find_all(&self) -> Result<Vec<InventoryItem>, AppError> {
        let items = sqlx::query_as::<_, InventoryItem>(
            "SELECT * FROM inventory_items ORDER BY category, name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Items at or below their reorder level
    pub async fn find_low_stock(&self) -> Result<Vec<InventoryItem>, AppError> {
        let items = sqlx::query_as::<_, InventoryItem>(
            "SELECT * FROM inventory_items WHERE quantity <= reorder_level ORDER BY quantity, name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    pub async fn code_exists(&self, item_code: &str, exclude_id: Option<Uuid>) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM inventory_items WHERE item_code = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(item_code)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    pub async fn update(&self, id: Uuid, input: &InventoryInput) -> Result<Option<InventoryItem>, AppError> {
        let item = sqlx::query_as::<_, InventoryItem>(
            r#"
            UPDATE inventory_items
            SET item_code = $2, name = $3, category = $4, quantity = $5, unit_price = $6,
                reorder_level = $7, supplier = $8, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.item_code)
        .bind(&input.name)
        .bind(&input.category)
        .bind(input.quantity)
        .bind(input.unit_price)
        .bind(input.reorder_level)
        .bind(&input.supplier)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Apply a stock movement atomically. `None` when the row is missing or
    /// the movement would take the quantity below zero.
    pub async fn adjust_quantity(&self, id: Uuid, delta: i32) -> Result<Option<InventoryItem>, AppError> {
        let item = sqlx::query_as::<_, InventoryItem>(
            r#"
            UPDATE inventory_items
            SET quantity = quantity + $2, updated_at = NOW()
            WHERE id = $1 AND quantity + $2 >= 0
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(delta)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    pub async fn count_by_category(&self) -> Result<Vec<FieldCount>, AppError> {
        let counts = sqlx::query_as::<_, FieldCount>(
            "SELECT category AS key, COUNT(*) AS count FROM inventory_items GROUP BY category ORDER BY category",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM inventory_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
