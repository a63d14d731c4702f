//! Inventory item model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: Uuid,
    pub item_code: String,
    pub name: String,
    pub category: String,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    pub reorder_level: i32,
    pub supplier: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Why a stock adjustment cannot be applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockAdjustmentError {
    /// Stock would go below zero
    Insufficient,
    /// Quantity would not fit the column
    Overflow,
}

impl InventoryItem {
    pub fn needs_reorder(&self) -> bool {
        self.quantity <= self.reorder_level
    }

    /// Quantity after applying `delta`
    pub fn adjusted_quantity(&self, delta: i32) -> Result<i32, StockAdjustmentError> {
        let quantity = self
            .quantity
            .checked_add(delta)
            .ok_or(StockAdjustmentError::Overflow)?;
        if quantity < 0 {
            return Err(StockAdjustmentError::Insufficient);
        }
        Ok(quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: i32, reorder_level: i32) -> InventoryItem {
        let now = Utc::now();
        InventoryItem {
            id: Uuid::new_v4(),
            item_code: "OIL-5W30".into(),
            name: "Engine oil 5W-30".into(),
            category: "Lubricants".into(),
            quantity,
            unit_price: Decimal::new(4550, 2),
            reorder_level,
            supplier: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_needs_reorder() {
        assert!(item(5, 5).needs_reorder());
        assert!(!item(6, 5).needs_reorder());
    }

    #[test]
    fn test_adjusted_quantity() {
        assert_eq!(item(10, 2).adjusted_quantity(-4), Ok(6));
        assert_eq!(item(10, 2).adjusted_quantity(-10), Ok(0));
        assert_eq!(
            item(10, 2).adjusted_quantity(-11),
            Err(StockAdjustmentError::Insufficient)
        );
    }

    #[test]
    fn test_adjusted_quantity_overflow() {
        assert_eq!(
            item(i32::MAX, 2).adjusted_quantity(1),
            Err(StockAdjustmentError::Overflow)
        );
        assert_eq!(item(5, 2).adjusted_quantity(i32::MAX), Err(StockAdjustmentError::Overflow));
        assert_eq!(item(0, 2).adjusted_quantity(i32::MIN), Err(StockAdjustmentError::Insufficient));
    }

    #[test]
    fn test_unit_price_serializes_as_number() {
        let json = serde_json::to_value(item(1, 1)).unwrap();
        assert_eq!(json["unitPrice"], 45.5);
        assert_eq!(json["itemCode"], "OIL-5W30");
    }
}
