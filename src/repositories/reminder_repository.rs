use chrono::Utc;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::dto::common::FieldCount;
use crate::dto::reminder_dto::{Completion, NewReminder};
use crate::models::service_reminder::{ReminderWithVehicle, ServiceReminder, STATUS_COMPLETED, STATUS_PENDING};
use crate::utils::errors::AppError;

const SELECT_WITH_VEHICLE: &str = r#"
    SELECT r.*, v.make, v.model, v.registration_number, v.mileage
    FROM service_reminders r
    JOIN vehicles v ON v.id = r.vehicle_id
"#;

/// Who to tell about a reminder, and about which vehicle
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NotificationTarget {
    pub email: String,
    pub make: String,
    pub model: String,
    pub registration_number: String,
}

pub struct ReminderRepository {
    pool: PgPool,
}

impl ReminderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn create(&self, new: &NewReminder) -> Result<ServiceReminder, AppError> {
        Self::insert(&self.pool, new).await
    }

    /// Insert on any executor, so it can join a transaction
    pub async fn insert<'e, E: PgExecutor<'e>>(
        executor: E,
        new: &NewReminder,
    ) -> Result<ServiceReminder, AppError> {
        let now = Utc::now();
        let reminder = sqlx::query_as::<_, ServiceReminder>(
            r#"
            INSERT INTO service_reminders (
                id, vehicle_id, service_type, due_date, due_mileage, priority, status, notes,
                estimated_cost, service_provider, recurring_interval, is_system_generated,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $13)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.vehicle_id)
        .bind(&new.service_type)
        .bind(new.due_date)
        .bind(new.due_mileage)
        .bind(&new.priority)
        .bind(STATUS_PENDING)
        .bind(&new.notes)
        .bind(new.estimated_cost)
        .bind(&new.service_provider)
        .bind(&new.recurring_interval)
        .bind(new.is_system_generated)
        .bind(now)
        .fetch_one(executor)
        .await?;

        Ok(reminder)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ServiceReminder>, AppError> {
        let reminder =
            sqlx::query_as::<_, ServiceReminder>("SELECT * FROM service_reminders WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(reminder)
    }

    pub async fn find_with_vehicle(&self, id: Uuid) -> Result<Option<ReminderWithVehicle>, AppError> {
        let sql = format!("{SELECT_WITH_VEHICLE} WHERE r.id = $1");
        let reminder = sqlx::query_as::<_, ReminderWithVehicle>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(reminder)
    }

    pub async fn find_all_with_vehicle(&self) -> Result<Vec<ReminderWithVehicle>, AppError> {
        let sql = format!("{SELECT_WITH_VEHICLE} ORDER BY r.due_date ASC NULLS LAST, r.created_at DESC");
        let reminders = sqlx::query_as::<_, ReminderWithVehicle>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(reminders)
    }

    pub async fn find_by_vehicle(&self, vehicle_id: Uuid) -> Result<Vec<ReminderWithVehicle>, AppError> {
        let sql = format!(
            "{SELECT_WITH_VEHICLE} WHERE r.vehicle_id = $1 ORDER BY r.due_date ASC NULLS LAST"
        );
        let reminders = sqlx::query_as::<_, ReminderWithVehicle>(&sql)
            .bind(vehicle_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(reminders)
    }

    pub async fn find_by_status(&self, status: &str) -> Result<Vec<ReminderWithVehicle>, AppError> {
        let sql = format!(
            "{SELECT_WITH_VEHICLE} WHERE r.status = $1 ORDER BY r.due_date ASC NULLS LAST"
        );
        let reminders = sqlx::query_as::<_, ReminderWithVehicle>(&sql)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;

        Ok(reminders)
    }

    pub async fn pending_exists(&self, vehicle_id: Uuid, service_type: &str) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM service_reminders WHERE vehicle_id = $1 AND service_type = $2 AND status = $3)",
        )
        .bind(vehicle_id)
        .bind(service_type)
        .bind(STATUS_PENDING)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    /// Persist every editable column of an already-merged reminder
    pub async fn update(&self, reminder: &ServiceReminder) -> Result<Option<ServiceReminder>, AppError> {
        let updated = sqlx::query_as::<_, ServiceReminder>(
            r#"
            UPDATE service_reminders
            SET service_type = $2, due_date = $3, due_mileage = $4, priority = $5, status = $6,
                notes = $7, estimated_cost = $8, service_provider = $9, recurring_interval = $10,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(reminder.id)
        .bind(&reminder.service_type)
        .bind(reminder.due_date)
        .bind(reminder.due_mileage)
        .bind(&reminder.priority)
        .bind(&reminder.status)
        .bind(&reminder.notes)
        .bind(reminder.estimated_cost)
        .bind(&reminder.service_provider)
        .bind(&reminder.recurring_interval)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Mark completed; notes are only replaced when new ones are given
    pub async fn mark_completed<'e, E: PgExecutor<'e>>(
        executor: E,
        id: Uuid,
        completion: &Completion,
    ) -> Result<Option<ServiceReminder>, AppError> {
        let reminder = sqlx::query_as::<_, ServiceReminder>(
            r#"
            UPDATE service_reminders
            SET status = $2, completed_at = NOW(),
                actual_service_date = COALESCE($3, actual_service_date),
                actual_service_mileage = COALESCE($4, actual_service_mileage),
                notes = COALESCE($5, notes),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(STATUS_COMPLETED)
        .bind(completion.actual_service_date)
        .bind(completion.actual_service_mileage)
        .bind(&completion.notes)
        .fetch_optional(executor)
        .await?;

        Ok(reminder)
    }

    /// Record the odometer reading of a finished service on the vehicle
    pub async fn record_service_mileage<'e, E: PgExecutor<'e>>(
        executor: E,
        vehicle_id: Uuid,
        mileage: i32,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE vehicles
            SET last_service_mileage = $2, mileage = GREATEST(mileage, $2), updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(vehicle_id)
        .bind(mileage)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn count_by_service_type(&self) -> Result<Vec<FieldCount>, AppError> {
        let counts = sqlx::query_as::<_, FieldCount>(
            "SELECT service_type AS key, COUNT(*) AS count FROM service_reminders GROUP BY service_type ORDER BY service_type",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }

    pub async fn count_by_status(&self) -> Result<Vec<FieldCount>, AppError> {
        let counts = sqlx::query_as::<_, FieldCount>(
            "SELECT status AS key, COUNT(*) AS count FROM service_reminders GROUP BY status ORDER BY status",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }

    /// Owner e-mail and vehicle description, when the vehicle has an owner with an address
    pub async fn notification_target(&self, vehicle_id: Uuid) -> Result<Option<NotificationTarget>, AppError> {
        let target = sqlx::query_as::<_, NotificationTarget>(
            r#"
            SELECT o.email AS email, v.make, v.model, v.registration_number
            FROM vehicles v
            JOIN owners o ON o.id = v.owner_id
            WHERE v.id = $1 AND o.email IS NOT NULL AND o.email <> ''
            "#,
        )
        .bind(vehicle_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(target)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM service_reminders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
