use serde_json::Value;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::dto::common::{counts_as_rows, MessageResponse};
use crate::dto::inventory_dto::{AdjustStockRequest, InventoryRequest};
use crate::models::inventory::{InventoryItem, StockAdjustmentError};
use crate::repositories::inventory_repository::InventoryRepository;
use crate::utils::errors::{bad_request_error, conflict_error, not_found_error, AppError};
use crate::utils::validation::{required, RequiredFields};

pub struct InventoryController {
    repository: InventoryRepository,
}

impl InventoryController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: InventoryRepository::new(pool),
        }
    }

    pub async fn create(&self, request: InventoryRequest) -> Result<InventoryItem, AppError> {
        let input = request.into_input("The following fields are required")?;

        if self.repository.code_exists(&input.item_code, None).await? {
            return Err(conflict_error(
                "An item with this code already exists",
                "itemCode",
                &input.item_code,
            ));
        }

        let item = self.repository.create(&input).await?;
        info!("📦 Inventory item {} added", item.item_code);
        Ok(item)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<InventoryItem, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Item"))
    }

    pub async fn list(&self) -> Result<Vec<InventoryItem>, AppError> {
        self.repository.find_all().await
    }

    pub async fn update(&self, id: Uuid, request: InventoryRequest) -> Result<InventoryItem, AppError> {
        let input = request.into_input("All required inputs are missing")?;
        self.get_by_id(id).await?;

        if self.repository.code_exists(&input.item_code, Some(id)).await? {
            return Err(conflict_error(
                "Another item with this code already exists",
                "itemCode",
                &input.item_code,
            ));
        }

        self.repository
            .update(id, &input)
            .await?
            .ok_or_else(|| not_found_error("Item"))
    }

    pub async fn delete(&self, id: Uuid) -> Result<MessageResponse, AppError> {
        if !self.repository.delete(id).await? {
            return Err(not_found_error("Item"));
        }
        info!("🗑️ Inventory item {} deleted", id);
        Ok(MessageResponse::new("Item deleted successfully"))
    }

    /// Positive delta restocks, negative consumes
    pub async fn adjust_stock(&self, id: Uuid, request: AdjustStockRequest) -> Result<InventoryItem, AppError> {
        RequiredFields::new()
            .check("delta", &request.delta)
            .finish("The following fields are required")?;
        let delta = required(request.delta, "delta")?;

        let item = self.get_by_id(id).await?;
        match item.adjusted_quantity(delta) {
            Ok(_) => {}
            Err(StockAdjustmentError::Insufficient) => {
                return Err(bad_request_error(&format!(
                    "Insufficient stock: {} in stock, adjustment of {}",
                    item.quantity, delta
                )));
            }
            Err(StockAdjustmentError::Overflow) => {
                return Err(bad_request_error(&format!(
                    "Stock quantity too large: {} in stock, adjustment of {}",
                    item.quantity, delta
                )));
            }
        }

        // Checked again in SQL in case of a concurrent withdrawal
        let updated = self
            .repository
            .adjust_quantity(id, delta)
            .await?
            .ok_or_else(|| bad_request_error("Insufficient stock"))?;

        if updated.needs_reorder() {
            info!(
                "📉 {} at {} units, reorder level {}",
                updated.item_code, updated.quantity, updated.reorder_level
            );
        }
        Ok(updated)
    }

    pub async fn low_stock(&self) -> Result<Vec<InventoryItem>, AppError> {
        self.repository.find_low_stock().await
    }

    pub async fn category_counts(&self) -> Result<Vec<Value>, AppError> {
        let counts = self.repository.count_by_category().await?;
        Ok(counts_as_rows(counts, "category"))
    }
}
