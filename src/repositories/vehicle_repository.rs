use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::common::FieldCount;
use crate::dto::vehicle_dto::VehicleInput;
use crate::models::vehicle::Vehicle;
use crate::utils::errors::AppError;

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: &VehicleInput) -> Result<Vehicle, AppError> {
        let now = Utc::now();
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (
                id, registration_number, make, model, year, fuel_type, vehicle_type,
                color, status, mileage, last_service_mileage, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $12)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.registration_number)
        .bind(&input.make)
        .bind(&input.model)
        .bind(input.year)
        .bind(&input.fuel_type)
        .bind(&input.vehicle_type)
        .bind(&input.color)
        .bind(&input.status)
        .bind(input.mileage.unwrap_or(0))
        .bind(input.last_service_mileage.unwrap_or(0))
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    pub async fn find_all(&self) -> Result<Vec<Vehicle>, AppError> {
        let vehicles =
            sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        Ok(vehicles)
    }

    pub async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    /// Registration number taken, optionally ignoring one vehicle
    pub async fn registration_exists(
        &self,
        registration_number: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM vehicles WHERE registration_number = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(registration_number)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    /// Overwrite the editable fields; optional ones left out keep their value.
    /// Returns `false` when nothing differed.
    pub async fn update(&self, id: Uuid, input: &VehicleInput) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE vehicles
            SET registration_number = $2, make = $3, model = $4, year = $5, fuel_type = $6,
                vehicle_type = $7, color = COALESCE($8, color), status = $9,
                mileage = COALESCE($10, mileage),
                last_service_mileage = COALESCE($11, last_service_mileage),
                updated_at = NOW()
            WHERE id = $1
              AND (registration_number, make, model, year, fuel_type, vehicle_type, color, status,
                   mileage, last_service_mileage)
                  IS DISTINCT FROM
                  ($2, $3, $4, $5, $6, $7, COALESCE($8, color), $9,
                   COALESCE($10, mileage), COALESCE($11, last_service_mileage))
            "#,
        )
        .bind(id)
        .bind(&input.registration_number)
        .bind(&input.make)
        .bind(&input.model)
        .bind(input.year)
        .bind(&input.fuel_type)
        .bind(&input.vehicle_type)
        .bind(&input.color)
        .bind(&input.status)
        .bind(input.mileage)
        .bind(input.last_service_mileage)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Point the vehicle at an owner row. Returns `false` when unchanged.
    pub async fn set_owner(&self, id: Uuid, owner_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE vehicles SET owner_id = $2, updated_at = NOW() WHERE id = $1 AND owner_id IS DISTINCT FROM $2",
        )
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Clear the owner of every vehicle that has it
    pub async fn clear_owner(&self, owner_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE vehicles SET owner_id = NULL, updated_at = NOW() WHERE owner_id = $1",
        )
        .bind(owner_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn update_mileage(&self, id: Uuid, mileage: i32) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            "UPDATE vehicles SET mileage = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(mileage)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn count_by_owner(&self, owner_id: Uuid) -> Result<i64, AppError> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM vehicles WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0)
    }

    pub async fn count_by_status(&self) -> Result<Vec<FieldCount>, AppError> {
        self.count_by("status").await
    }

    pub async fn count_by_type(&self) -> Result<Vec<FieldCount>, AppError> {
        self.count_by("vehicle_type").await
    }

    // `column` is always one of the literals above
    async fn count_by(&self, column: &'static str) -> Result<Vec<FieldCount>, AppError> {
        let sql = format!(
            "SELECT {column} AS key, COUNT(*) AS count FROM vehicles GROUP BY {column} ORDER BY {column}"
        );
        let counts = sqlx::query_as::<_, FieldCount>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(counts)
    }

    /// Returns `false` when no vehicle had that id
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
