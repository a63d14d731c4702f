use serde_json::Value;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::dto::common::{counts_as_rows, MessageResponse};
use crate::dto::vehicle_dto::{
    RemoveOwnerResponse, UpdateMileageRequest, UpdateVehicleOwnerRequest, VehicleRequest,
};
use crate::models::vehicle::Vehicle;
use crate::repositories::owner_repository::OwnerRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::{bad_request_error, conflict_error, not_found_error, AppError};
use crate::utils::validation::{required, RequiredFields};
use validator::Validate;

pub struct VehicleController {
    repository: VehicleRepository,
    owners: OwnerRepository,
}

impl VehicleController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: VehicleRepository::new(pool.clone()),
            owners: OwnerRepository::new(pool),
        }
    }

    pub async fn create(&self, request: VehicleRequest) -> Result<MessageResponse, AppError> {
        let input = request.into_input("The following fields are required")?;

        if self
            .repository
            .registration_exists(&input.registration_number, None)
            .await?
        {
            return Err(conflict_error(
                "A vehicle with this registration number already exists",
                "registrationNumber",
                &input.registration_number,
            ));
        }

        let vehicle = self.repository.create(&input).await?;
        info!("🚗 Vehicle {} added ({})", vehicle.registration_number, vehicle.id);

        Ok(MessageResponse::new("New vehicle added successfully!"))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Vehicle, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle"))
    }

    pub async fn list(&self) -> Result<Vec<Vehicle>, AppError> {
        self.repository.find_all().await
    }

    pub async fn update(&self, id: Uuid, request: VehicleRequest) -> Result<MessageResponse, AppError> {
        let input = request.into_input("All required inputs are missing")?;

        if self.repository.find_by_id(id).await?.is_none() {
            return Err(not_found_error("Vehicle"));
        }

        if self
            .repository
            .registration_exists(&input.registration_number, Some(id))
            .await?
        {
            return Err(conflict_error(
                "Another vehicle with this registration number already exists",
                "registrationNumber",
                &input.registration_number,
            ));
        }

        if !self.repository.update(id, &input).await? {
            return Err(bad_request_error("No changes were made"));
        }

        info!("🚗 Vehicle {} updated", id);
        Ok(MessageResponse::new("Vehicle updated successfully!"))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repository.delete(id).await? {
            return Err(not_found_error("Vehicle"));
        }
        info!("🗑️ Vehicle {} deleted", id);
        Ok(())
    }

    pub async fn status_counts(&self) -> Result<Vec<Value>, AppError> {
        let counts = self.repository.count_by_status().await?;
        Ok(counts_as_rows(counts, "status"))
    }

    pub async fn type_counts(&self) -> Result<Vec<Value>, AppError> {
        let counts = self.repository.count_by_type().await?;
        Ok(counts_as_rows(counts, "vehicleType"))
    }

    /// Attach the owner identified by its business id (`OWN…`)
    pub async fn update_owner(
        &self,
        id: Uuid,
        request: UpdateVehicleOwnerRequest,
    ) -> Result<MessageResponse, AppError> {
        RequiredFields::new()
            .check("ownerId", &request.owner_id)
            .finish("The following fields are required")?;
        let owner_id = required(request.owner_id, "ownerId")?;

        if self.repository.find_by_id(id).await?.is_none() {
            return Err(not_found_error("Vehicle"));
        }

        let owner = self
            .owners
            .find_by_owner_id(owner_id.trim())
            .await?
            .ok_or_else(|| AppError::NotFound("Owner not found".to_string()))?;

        if !self.repository.set_owner(id, owner.id).await? {
            return Err(bad_request_error("No changes were made"));
        }

        info!("🔗 Vehicle {} assigned to owner {}", id, owner.owner_id);
        Ok(MessageResponse::new("Vehicle owner updated successfully!"))
    }

    pub async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Vehicle>, AppError> {
        self.repository.find_by_owner(owner_id).await
    }

    pub async fn remove_owner(&self, owner_id: Uuid) -> Result<RemoveOwnerResponse, AppError> {
        let vehicles_updated = self.repository.clear_owner(owner_id).await?;
        info!("🔓 Owner {} removed from {} vehicles", owner_id, vehicles_updated);

        Ok(RemoveOwnerResponse {
            message: "Owner removed from vehicles".to_string(),
            vehicles_updated,
        })
    }

    /// Odometer readings only move forward
    pub async fn update_mileage(
        &self,
        id: Uuid,
        request: UpdateMileageRequest,
    ) -> Result<Vehicle, AppError> {
        RequiredFields::new()
            .check("mileage", &request.mileage)
            .finish("The following fields are required")?;
        request.validate()?;
        let mileage = required(request.mileage, "mileage")?;

        let vehicle = self.get_by_id(id).await?;
        if mileage < vehicle.mileage {
            return Err(bad_request_error(&format!(
                "Mileage cannot be lower than the current reading of {}",
                vehicle.mileage
            )));
        }

        self.repository
            .update_mileage(id, mileage)
            .await?
            .ok_or_else(|| not_found_error("Vehicle"))
    }
}
