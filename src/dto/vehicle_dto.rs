use serde::{Deserialize, Serialize};
use serde_with::{serde_as, NoneAsEmptyString, PickFirst};
use validator::Validate;

use crate::models::vehicle::{DEFAULT_VEHICLE_STATUS, FUEL_TYPES, VEHICLE_STATUSES, VEHICLE_TYPES};
use crate::utils::errors::AppResult;
use crate::utils::validation::{
    field_error, required, validate_enum, validate_model_year, RequiredFields,
};

// Body of add-vehicle and update-vehicle. Numbers may arrive as form strings.
#[serde_as]
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRequest {
    #[validate(length(max = 20))]
    pub registration_number: Option<String>,
    #[validate(length(max = 100))]
    pub make: Option<String>,
    #[validate(length(max = 100))]
    pub model: Option<String>,
    #[serde(default)]
    #[serde_as(as = "PickFirst<(_, NoneAsEmptyString)>")]
    pub year: Option<i32>,
    pub fuel_type: Option<String>,
    pub vehicle_type: Option<String>,
    #[validate(length(max = 50))]
    pub color: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    #[serde_as(as = "PickFirst<(_, NoneAsEmptyString)>")]
    #[validate(range(min = 0))]
    pub mileage: Option<i32>,
    #[serde(default)]
    #[serde_as(as = "PickFirst<(_, NoneAsEmptyString)>")]
    #[validate(range(min = 0))]
    pub last_service_mileage: Option<i32>,
}

// Checked vehicle fields ready for the repository
#[derive(Debug, Clone)]
pub struct VehicleInput {
    pub registration_number: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub fuel_type: String,
    pub vehicle_type: String,
    pub color: Option<String>,
    pub status: String,
    pub mileage: Option<i32>,
    pub last_service_mileage: Option<i32>,
}

impl VehicleRequest {
    /// Presence, then format checks. `missing_message` heads the 400 body.
    pub fn into_input(self, missing_message: &str) -> AppResult<VehicleInput> {
        RequiredFields::new()
            .check("registrationNumber", &self.registration_number)
            .check("make", &self.make)
            .check("model", &self.model)
            .check("year", &self.year)
            .check("fuelType", &self.fuel_type)
            .check("vehicleType", &self.vehicle_type)
            .finish(missing_message)?;

        self.validate()?;

        let year = required(self.year, "year")?;
        validate_model_year(year).map_err(|e| field_error("year", e))?;

        let fuel_type = required(self.fuel_type, "fuelType")?;
        validate_enum(&fuel_type, FUEL_TYPES).map_err(|e| field_error("fuelType", e))?;

        let vehicle_type = required(self.vehicle_type, "vehicleType")?;
        validate_enum(&vehicle_type, VEHICLE_TYPES).map_err(|e| field_error("vehicleType", e))?;

        let status = self
            .status
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_VEHICLE_STATUS.to_string());
        validate_enum(&status, VEHICLE_STATUSES).map_err(|e| field_error("status", e))?;

        Ok(VehicleInput {
            registration_number: required(self.registration_number, "registrationNumber")?
                .trim()
                .to_string(),
            make: required(self.make, "make")?.trim().to_string(),
            model: required(self.model, "model")?.trim().to_string(),
            year,
            fuel_type,
            vehicle_type,
            color: self.color.filter(|c| !c.trim().is_empty()),
            status,
            mileage: self.mileage,
            last_service_mileage: self.last_service_mileage,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVehicleOwnerRequest {
    /// Business id of the owner, e.g. `OWN61849195`
    pub owner_id: Option<String>,
}

#[serde_as]
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMileageRequest {
    #[serde(default)]
    #[serde_as(as = "PickFirst<(_, NoneAsEmptyString)>")]
    #[validate(range(min = 0))]
    pub mileage: Option<i32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveOwnerResponse {
    pub message: String,
    pub vehicles_updated: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::errors::AppError;
    use chrono::{Datelike, Utc};

    fn complete() -> VehicleRequest {
        VehicleRequest {
            registration_number: Some(" CAB-1234 ".into()),
            make: Some("Toyota".into()),
            model: Some("Axio".into()),
            year: Some(2015),
            fuel_type: Some("Hybrid".into()),
            vehicle_type: Some("Sedan".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_complete_request_defaults_status() {
        let input = complete().into_input("required").unwrap();
        assert_eq!(input.registration_number, "CAB-1234");
        assert_eq!(input.status, "Active");
        assert_eq!(input.color, None);
    }

    #[test]
    fn test_missing_fields_are_listed() {
        let request = VehicleRequest {
            make: Some("Toyota".into()),
            ..Default::default()
        };
        match request.into_input("The following fields are required") {
            Err(AppError::MissingFields { fields, .. }) => assert_eq!(
                fields,
                vec!["registrationNumber", "model", "year", "fuelType", "vehicleType"]
            ),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_fuel_type() {
        let request = VehicleRequest {
            fuel_type: Some("Steam".into()),
            ..complete()
        };
        assert!(matches!(request.into_input("required"), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_rejects_future_year() {
        let request = VehicleRequest {
            year: Some(Utc::now().year() + 1),
            ..complete()
        };
        assert!(matches!(request.into_input("required"), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_rejects_negative_mileage() {
        let request = VehicleRequest {
            mileage: Some(-5),
            ..complete()
        };
        assert!(matches!(request.into_input("required"), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_deserializes_camel_case() {
        let request: VehicleRequest = serde_json::from_str(
            r#"{"registrationNumber":"WP-KA-1234","fuelType":"Diesel","vehicleType":"Van","lastServiceMileage":12000}"#,
        )
        .unwrap();
        assert_eq!(request.registration_number.as_deref(), Some("WP-KA-1234"));
        assert_eq!(request.last_service_mileage, Some(12000));
    }

    #[test]
    fn test_empty_year_counts_as_missing() {
        let request: VehicleRequest = serde_json::from_str(
            r#"{"registrationNumber":"CAB-1234","make":"Toyota","model":"Axio","year":"","fuelType":"Hybrid","vehicleType":"Sedan"}"#,
        )
        .unwrap();
        match request.into_input("The following fields are required") {
            Err(AppError::MissingFields { fields, .. }) => assert_eq!(fields, vec!["year"]),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_numbers_accepted_as_form_strings() {
        let request: VehicleRequest =
            serde_json::from_str(r#"{"year":"2015","mileage":"84000","lastServiceMileage":null}"#).unwrap();
        assert_eq!(request.year, Some(2015));
        assert_eq!(request.mileage, Some(84000));
        assert_eq!(request.last_service_mileage, None);
        assert!(serde_json::from_str::<VehicleRequest>(r#"{"year":"twenty"}"#).is_err());
    }
}
