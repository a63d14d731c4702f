use rust_decimal::Decimal;
use serde::Deserialize;
use serde_with::{serde_as, NoneAsEmptyString, PickFirst};
use validator::{Validate, ValidationErrors};

use crate::utils::errors::AppResult;
use crate::utils::validation::{required, validate_non_negative, RequiredFields};

#[serde_as]
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRequest {
    #[validate(length(max = 50))]
    pub item_code: Option<String>,
    #[validate(length(max = 150))]
    pub name: Option<String>,
    #[validate(length(max = 100))]
    pub category: Option<String>,
    #[serde(default)]
    #[serde_as(as = "PickFirst<(_, NoneAsEmptyString)>")]
    #[validate(range(min = 0))]
    pub quantity: Option<i32>,
    #[serde(default)]
    #[serde_as(as = "PickFirst<(_, NoneAsEmptyString)>")]
    pub unit_price: Option<Decimal>,
    #[serde(default)]
    #[serde_as(as = "PickFirst<(_, NoneAsEmptyString)>")]
    #[validate(range(min = 0))]
    pub reorder_level: Option<i32>,
    pub supplier: Option<String>,
}

#[derive(Debug, Clone)]
pub struct InventoryInput {
    pub item_code: String,
    pub name: String,
    pub category: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub reorder_level: i32,
    pub supplier: Option<String>,
}

impl InventoryRequest {
    pub fn into_input(self, missing_message: &str) -> AppResult<InventoryInput> {
        RequiredFields::new()
            .check("itemCode", &self.item_code)
            .check("name", &self.name)
            .check("category", &self.category)
            .check("quantity", &self.quantity)
            .require("unitPrice", self.unit_price.is_some())
            .finish(missing_message)?;

        self.validate()?;

        let unit_price = required(self.unit_price, "unitPrice")?;
        if let Err(error) = validate_non_negative(unit_price) {
            let mut errors = ValidationErrors::new();
            errors.add("unitPrice", error);
            return Err(errors.into());
        }

        Ok(InventoryInput {
            item_code: required(self.item_code, "itemCode")?.trim().to_string(),
            name: required(self.name, "name")?.trim().to_string(),
            category: required(self.category, "category")?.trim().to_string(),
            quantity: required(self.quantity, "quantity")?,
            unit_price,
            reorder_level: self.reorder_level.unwrap_or(0),
            supplier: self.supplier.filter(|s| !s.trim().is_empty()),
        })
    }
}

#[serde_as]
#[derive(Debug, Deserialize)]
pub struct AdjustStockRequest {
    #[serde(default)]
    #[serde_as(as = "PickFirst<(_, NoneAsEmptyString)>")]
    pub delta: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::errors::AppError;

    #[test]
    fn test_missing_fields() {
        let request = InventoryRequest {
            item_code: Some("TYR-195".into()),
            ..Default::default()
        };
        match request.into_input("The following fields are required") {
            Err(AppError::MissingFields { fields, .. }) => {
                assert_eq!(fields, vec!["name", "category", "quantity", "unitPrice"])
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_price_from_json_number() {
        let request: InventoryRequest = serde_json::from_str(
            r#"{"itemCode":"TYR-195","name":"Tyre 195/65R15","category":"Tyres","quantity":8,"unitPrice":18500.5}"#,
        )
        .unwrap();
        let input = request.into_input("required").unwrap();
        assert_eq!(input.unit_price, Decimal::new(185005, 1));
        assert_eq!(input.reorder_level, 0);
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let request = InventoryRequest {
            item_code: Some("TYR-195".into()),
            name: Some("Tyre".into()),
            category: Some("Tyres".into()),
            quantity: Some(-1),
            unit_price: Some(Decimal::ONE),
            ..Default::default()
        };
        assert!(matches!(request.into_input("required"), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_negative_price_rejected() {
        let request = InventoryRequest {
            item_code: Some("OIL-5W30".into()),
            name: Some("Engine oil 5W-30".into()),
            category: Some("Lubricants".into()),
            quantity: Some(4),
            unit_price: Some(Decimal::new(-1, 0)),
            ..Default::default()
        };
        assert!(matches!(request.into_input("required"), Err(AppError::Validation(_))));
    }
}
