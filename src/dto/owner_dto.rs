use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::owner::{generate_owner_id, GENDERS, MIN_OWNER_AGE};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::{
    age_on, field_error, required, validate_contact, validate_date, validate_enum,
    validate_license_number, RequiredFields,
};

// Body of add-owner and update-owner
#[derive(Debug, Default, Deserialize, Validate)]
pub struct OwnerRequest {
    pub owner_id: Option<String>,
    #[validate(length(max = 100))]
    pub name: Option<String>,
    pub contact: Option<String>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
    pub license_number: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub vehicles: Option<Vec<Uuid>>,
}

/// Checked owner fields. `email` and `vehicles` left as `None` keep their
/// stored value on update.
#[derive(Debug, Clone)]
pub struct OwnerInput {
    pub owner_id: String,
    pub name: String,
    pub contact: String,
    pub address: String,
    pub license_number: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub email: Option<String>,
    pub vehicles: Option<Vec<Uuid>>,
}

/// How a missing `owner_id` is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerIdPolicy {
    /// Mint a fresh `OWN…` id
    Generate,
    /// Report it as a missing field
    Require,
}

impl OwnerRequest {
    pub fn into_input(
        self,
        policy: OwnerIdPolicy,
        missing_message: &str,
        today: NaiveDate,
    ) -> AppResult<OwnerInput> {
        let mut fields = RequiredFields::new();
        if policy == OwnerIdPolicy::Require {
            fields.check("owner_id", &self.owner_id);
        }
        fields
            .check("name", &self.name)
            .check("contact", &self.contact)
            .check("address", &self.address)
            .check("license_number", &self.license_number)
            .check("date_of_birth", &self.date_of_birth)
            .check("gender", &self.gender)
            .finish(missing_message)?;

        self.validate()?;

        let contact = required(self.contact, "contact")?.trim().to_string();
        validate_contact(&contact).map_err(|e| field_error("contact", e))?;

        let license_number = required(self.license_number, "license_number")?.trim().to_string();
        validate_license_number(&license_number).map_err(|e| field_error("license_number", e))?;

        let date_of_birth = validate_date(&required(self.date_of_birth, "date_of_birth")?)
            .map_err(|e| field_error("date_of_birth", e))?;
        if age_on(date_of_birth, today) < MIN_OWNER_AGE {
            return Err(AppError::BadRequest(format!(
                "Owner must be at least {} years old",
                MIN_OWNER_AGE
            )));
        }

        let gender = required(self.gender, "gender")?;
        validate_enum(&gender, GENDERS).map_err(|e| field_error("gender", e))?;

        let owner_id = match self.owner_id.filter(|id| !id.trim().is_empty()) {
            Some(id) => id.trim().to_string(),
            None => generate_owner_id(),
        };

        Ok(OwnerInput {
            owner_id,
            name: required(self.name, "name")?.trim().to_string(),
            contact,
            address: required(self.address, "address")?.trim().to_string(),
            license_number,
            date_of_birth,
            gender,
            email: self.email.filter(|e| !e.trim().is_empty()),
            vehicles: self.vehicles,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct OwnerSearchQuery {
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerVehicleCheck {
    pub has_vehicles: bool,
    pub count: i64,
}
