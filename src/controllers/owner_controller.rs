use chrono::Utc;
use serde_json::Value;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::dto::common::{counts_as_rows, MessageResponse};
use crate::dto::owner_dto::{OwnerIdPolicy, OwnerInput, OwnerRequest, OwnerVehicleCheck};
use crate::models::owner::Owner;
use crate::repositories::owner_repository::{OwnerRepository, OwnerUniqueField};
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::{bad_request_error, conflict_error, not_found_error, AppError};

pub struct OwnerController {
    repository: OwnerRepository,
    vehicles: VehicleRepository,
}

impl OwnerController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: OwnerRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool),
        }
    }

    pub async fn create(&self, request: OwnerRequest) -> Result<MessageResponse, AppError> {
        let input = request.into_input(
            OwnerIdPolicy::Generate,
            "The following fields are required",
            Utc::now().date_naive(),
        )?;

        self.ensure_unique(&input, None, "An owner").await?;

        let owner = self.repository.create(&input).await?;
        info!("👤 Owner {} added ({})", owner.owner_id, owner.id);

        Ok(MessageResponse::new("New owner added successfully!"))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Owner, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Owner"))
    }

    pub async fn get_by_owner_id(&self, owner_id: &str) -> Result<Owner, AppError> {
        self.repository
            .find_by_owner_id(owner_id.trim())
            .await?
            .ok_or_else(|| not_found_error("Owner"))
    }

    pub async fn list(&self) -> Result<Vec<Owner>, AppError> {
        self.repository.find_all().await
    }

    pub async fn update(&self, id: Uuid, request: OwnerRequest) -> Result<MessageResponse, AppError> {
        let input = request.into_input(
            OwnerIdPolicy::Require,
            "All required inputs are missing",
            Utc::now().date_naive(),
        )?;

        if self.repository.find_by_id(id).await?.is_none() {
            return Err(not_found_error("Owner"));
        }

        self.ensure_unique(&input, Some(id), "Another owner").await?;

        if !self.repository.update(id, &input).await? {
            return Err(bad_request_error("No changes were made"));
        }

        info!("👤 Owner {} updated", id);
        Ok(MessageResponse::new("Owner updated successfully!"))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repository.delete(id).await? {
            return Err(not_found_error("Owner"));
        }
        info!("🗑️ Owner {} deleted", id);
        Ok(())
    }

    pub async fn gender_counts(&self) -> Result<Vec<Value>, AppError> {
        let counts = self.repository.count_by_gender().await?;
        Ok(counts_as_rows(counts, "gender"))
    }

    pub async fn search(&self, query: Option<String>) -> Result<Vec<Owner>, AppError> {
        let query = query
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .ok_or_else(|| bad_request_error("Search query is required"))?;

        self.repository.search_by_name(&query).await
    }

    pub async fn check_vehicles(&self, id: Uuid) -> Result<OwnerVehicleCheck, AppError> {
        let count = self.vehicles.count_by_owner(id).await?;
        Ok(OwnerVehicleCheck {
            has_vehicles: count > 0,
            count,
        })
    }

    // Checked in the order the console reports them: id, contact, licence
    async fn ensure_unique(
        &self,
        input: &OwnerInput,
        exclude_id: Option<Uuid>,
        subject: &str,
    ) -> Result<(), AppError> {
        let checks = [
            (OwnerUniqueField::OwnerId, "owner_id", input.owner_id.as_str(), "ID"),
            (OwnerUniqueField::Contact, "contact", input.contact.as_str(), "contact number"),
            (
                OwnerUniqueField::LicenseNumber,
                "license_number",
                input.license_number.as_str(),
                "license number",
            ),
        ];

        for (field, name, value, label) in checks {
            if self.repository.exists(field, value, exclude_id).await? {
                return Err(conflict_error(
                    &format!("{} with this {} already exists", subject, label),
                    name,
                    value,
                ));
            }
        }

        Ok(())
    }
}
