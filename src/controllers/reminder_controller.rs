use chrono::Utc;
use serde_json::{Map, Value};
use sqlx::PgPool;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::dto::common::{counts_as_object, MessageResponse};
use crate::dto::reminder_dto::{
    AutoGenerateResponse, CompleteReminderRequest, CreateReminderRequest, NewReminder,
    UpdateReminderRequest,
};
use crate::models::service_reminder::{
    OverdueReminderDetail, ReminderStatusFilter, ReminderWithVehicle, ServiceReminder,
    AUTO_RECURRING_INTERVAL, AUTO_SERVICE_TYPE, DEFAULT_PRIORITY, STATUS_COMPLETED, STATUS_PENDING,
};
use crate::repositories::reminder_repository::ReminderRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::notification_service::ReminderNotifier;
use crate::services::prediction_service::ServiceDatePredictor;
use crate::utils::errors::{bad_request_error, AppError};

fn reminder_not_found() -> AppError {
    AppError::NotFound("Service reminder not found".to_string())
}

fn vehicle_not_found() -> AppError {
    AppError::NotFound("Vehicle not found".to_string())
}

pub struct ReminderController {
    repository: ReminderRepository,
    vehicles: VehicleRepository,
    predictor: Arc<dyn ServiceDatePredictor>,
    notifier: ReminderNotifier,
}

impl ReminderController {
    pub fn new(
        pool: PgPool,
        predictor: Arc<dyn ServiceDatePredictor>,
        notifier: ReminderNotifier,
    ) -> Self {
        Self {
            repository: ReminderRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool),
            predictor,
            notifier,
        }
    }

    pub async fn create(&self, request: CreateReminderRequest) -> Result<ServiceReminder, AppError> {
        let new = request.into_new_reminder()?;

        if self.vehicles.find_by_id(new.vehicle_id).await?.is_none() {
            return Err(vehicle_not_found());
        }

        let reminder = self.repository.create(&new).await?;
        info!(
            "🔔 Reminder {} ({}) created for vehicle {}",
            reminder.id, reminder.service_type, reminder.vehicle_id
        );

        self.notify_owner(&reminder).await;
        Ok(reminder)
    }

    pub async fn list(&self) -> Result<Vec<ReminderWithVehicle>, AppError> {
        self.repository.find_all_with_vehicle().await
    }

    pub async fn list_by_vehicle(&self, vehicle_id: Uuid) -> Result<Vec<ReminderWithVehicle>, AppError> {
        self.repository.find_by_vehicle(vehicle_id).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<ReminderWithVehicle, AppError> {
        self.repository
            .find_with_vehicle(id)
            .await?
            .ok_or_else(reminder_not_found)
    }

    /// Partial update. Setting the status back to Pending re-notifies the owner.
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateReminderRequest,
    ) -> Result<ReminderWithVehicle, AppError> {
        if request.clears_both_due_fields() {
            return Err(bad_request_error("Either dueDate or dueMileage must be provided"));
        }

        let mut reminder = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(reminder_not_found)?;

        let reopened = request.new_status() == Some(STATUS_PENDING);
        request.apply_to(&mut reminder)?;

        let updated = self
            .repository
            .update(&reminder)
            .await?
            .ok_or_else(reminder_not_found)?;

        if reopened {
            self.notify_owner(&updated).await;
        }

        self.get_by_id(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<MessageResponse, AppError> {
        if !self.repository.delete(id).await? {
            return Err(reminder_not_found());
        }
        info!("🗑️ Reminder {} deleted", id);
        Ok(MessageResponse::new("Service reminder deleted successfully"))
    }

    /// Mark as done. A recurring reminder gets a predicted follow-up; both
    /// writes (and the vehicle's service mileage) commit together.
    pub async fn complete(
        &self,
        id: Uuid,
        request: CompleteReminderRequest,
    ) -> Result<ServiceReminder, AppError> {
        let completion = request.into_completion()?;

        let reminder = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(reminder_not_found)?;

        let mut vehicle = self
            .vehicles
            .find_by_id(reminder.vehicle_id)
            .await?
            .ok_or_else(vehicle_not_found)?;

        if let Some(mileage) = completion.actual_service_mileage {
            vehicle.last_service_mileage = mileage;
            vehicle.mileage = vehicle.mileage.max(mileage);
        }

        // Predict before opening the transaction; the script may take a while
        let follow_up = match reminder.recurring_interval.as_deref() {
            Some(interval) => {
                let due = self.predictor.predict(&vehicle, &reminder.service_type).await;
                Some(NewReminder::system(
                    vehicle.id,
                    &reminder.service_type,
                    due,
                    &reminder.priority,
                    interval,
                ))
            }
            None => None,
        };

        let mut tx = self.repository.pool().begin().await?;

        let completed = ReminderRepository::mark_completed(&mut *tx, id, &completion)
            .await?
            .ok_or_else(reminder_not_found)?;

        if let Some(mileage) = completion.actual_service_mileage {
            ReminderRepository::record_service_mileage(&mut *tx, vehicle.id, mileage).await?;
        }

        if let Some(follow_up) = &follow_up {
            let next = ReminderRepository::insert(&mut *tx, follow_up).await?;
            info!(
                "🔁 Follow-up reminder {} due {:?} created for vehicle {}",
                next.id, next.due_date, vehicle.id
            );
        }

        tx.commit().await?;

        info!("✅ Reminder {} completed", id);
        Ok(completed)
    }

    pub async fn overdue(&self) -> Result<Vec<ReminderWithVehicle>, AppError> {
        let now = Utc::now();
        let pending = self.repository.find_by_status(STATUS_PENDING).await?;
        Ok(pending.into_iter().filter(|r| r.is_overdue(now)).collect())
    }

    pub async fn overdue_details(&self) -> Result<Vec<OverdueReminderDetail>, AppError> {
        let overdue = self.overdue().await?;
        Ok(overdue.into_iter().map(OverdueReminderDetail::from).collect())
    }

    pub async fn by_status(&self, status: &str) -> Result<Vec<ReminderWithVehicle>, AppError> {
        let filter = ReminderStatusFilter::from_str(status).map_err(|_| AppError::InvalidChoice {
            message: format!(
                "Invalid status. Valid statuses: {}",
                ReminderStatusFilter::VALID.join(", ")
            ),
            allowed: ReminderStatusFilter::VALID,
        })?;

        match filter {
            ReminderStatusFilter::Pending => self.repository.find_by_status(STATUS_PENDING).await,
            ReminderStatusFilter::Completed => {
                self.repository.find_by_status(STATUS_COMPLETED).await
            }
            ReminderStatusFilter::Overdue => self.overdue().await,
        }
    }

    /// One pending oil change per vehicle, dated by the predictor
    pub async fn generate_auto(&self) -> Result<AutoGenerateResponse, AppError> {
        let vehicles = self.vehicles.find_all().await?;
        let mut reminders_created: u32 = 0;

        for vehicle in vehicles {
            if self
                .repository
                .pending_exists(vehicle.id, AUTO_SERVICE_TYPE)
                .await?
            {
                continue;
            }

            let due = self.predictor.predict(&vehicle, AUTO_SERVICE_TYPE).await;
            let new = NewReminder::system(
                vehicle.id,
                AUTO_SERVICE_TYPE,
                due,
                DEFAULT_PRIORITY,
                AUTO_RECURRING_INTERVAL,
            );
            let reminder = match self.repository.create(&new).await {
                Ok(reminder) => reminder,
                Err(e) if e.is_foreign_key_violation() => {
                    warn!("⚠️ Vehicle {} removed during auto-generation, skipped", vehicle.id);
                    continue;
                }
                Err(e) => return Err(e),
            };
            reminders_created += 1;

            self.notify_owner(&reminder).await;
        }

        info!("🤖 Auto-generated {} service reminders", reminders_created);
        Ok(AutoGenerateResponse {
            message: format!("Auto-generated {} service reminders", reminders_created),
            reminders_created,
        })
    }

    pub async fn service_type_counts(&self) -> Result<Map<String, Value>, AppError> {
        let counts = self.repository.count_by_service_type().await?;
        Ok(counts_as_object(counts))
    }

    /// Stored statuses plus the derived Overdue count
    pub async fn status_counts(&self) -> Result<Map<String, Value>, AppError> {
        let counts = self.repository.count_by_status().await?;
        let overdue = self.overdue().await?.len();

        let mut result = counts_as_object(counts);
        for status in [STATUS_PENDING, STATUS_COMPLETED] {
            result.entry(status).or_insert(Value::from(0));
        }
        result.insert("Overdue".to_string(), Value::from(overdue));

        Ok(result)
    }

    // Lookup failures must not fail the request that triggered the notification
    async fn notify_owner(&self, reminder: &ServiceReminder) {
        match self.repository.notification_target(reminder.vehicle_id).await {
            Ok(Some(target)) => self.notifier.notify(&target, reminder),
            Ok(None) => {}
            Err(e) => warn!("⚠️ Could not look up owner for reminder {}: {}", reminder.id, e),
        }
    }
}
