use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, NoneAsEmptyString, PickFirst};
use uuid::Uuid;
use validator::Validate;

use crate::models::service_reminder::{
    ServiceReminder, DEFAULT_PRIORITY, PRIORITIES, STORED_STATUSES,
};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::{
    field_error, parse_id, required, validate_datetime, validate_enum,
    RequiredFields,
};

#[serde_as]
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReminderRequest {
    pub vehicle: Option<String>,
    #[validate(length(max = 100))]
    pub service_type: Option<String>,
    pub due_date: Option<String>,
    #[serde(default)]
    #[serde_as(as = "PickFirst<(_, NoneAsEmptyString)>")]
    #[validate(range(min = 0))]
    pub due_mileage: Option<i32>,
    pub priority: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    #[serde_as(as = "PickFirst<(_, NoneAsEmptyString)>")]
    pub estimated_cost: Option<Decimal>,
    pub service_provider: Option<String>,
    pub recurring_interval: Option<String>,
}

/// Checked fields of a reminder about to be inserted
#[derive(Debug, Clone)]
pub struct NewReminder {
    pub vehicle_id: Uuid,
    pub service_type: String,
    pub due_date: Option<DateTime<Utc>>,
    pub due_mileage: Option<i32>,
    pub priority: String,
    pub notes: Option<String>,
    pub estimated_cost: Option<Decimal>,
    pub service_provider: Option<String>,
    pub recurring_interval: Option<String>,
    pub is_system_generated: bool,
}

impl NewReminder {
    /// System-generated follow-up or automatic reminder
    pub fn system(
        vehicle_id: Uuid,
        service_type: &str,
        due_date: DateTime<Utc>,
        priority: &str,
        recurring_interval: &str,
    ) -> Self {
        Self {
            vehicle_id,
            service_type: service_type.to_string(),
            due_date: Some(due_date),
            due_mileage: None,
            priority: priority.to_string(),
            notes: None,
            estimated_cost: None,
            service_provider: None,
            recurring_interval: Some(recurring_interval.to_string()),
            is_system_generated: true,
        }
    }
}

impl CreateReminderRequest {
    pub fn into_new_reminder(self) -> AppResult<NewReminder> {
        let has_due = self.due_date.as_deref().map_or(false, |d| !d.trim().is_empty())
            || self.due_mileage.is_some();

        RequiredFields::new()
            .check("vehicle", &self.vehicle)
            .check("serviceType", &self.service_type)
            .require("dueDate or dueMileage", has_due)
            .finish("Missing required fields")?;

        self.validate()?;

        let vehicle_id = parse_id(&required(self.vehicle, "vehicle")?, "vehicle")?;

        let due_date = self
            .due_date
            .filter(|d| !d.trim().is_empty())
            .map(|d| validate_datetime(&d))
            .transpose()
            .map_err(|e| field_error("dueDate", e))?;

        let priority = self
            .priority
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PRIORITY.to_string());
        validate_enum(&priority, PRIORITIES).map_err(|e| field_error("priority", e))?;

        if self.estimated_cost.map_or(false, |c| c.is_sign_negative()) {
            return Err(AppError::BadRequest("estimatedCost cannot be negative".to_string()));
        }

        Ok(NewReminder {
            vehicle_id,
            service_type: required(self.service_type, "serviceType")?.trim().to_string(),
            due_date,
            due_mileage: self.due_mileage,
            priority,
            notes: self.notes,
            estimated_cost: self.estimated_cost,
            service_provider: self.service_provider,
            recurring_interval: self.recurring_interval.filter(|r| !r.trim().is_empty()),
            is_system_generated: false,
        })
    }
}

/// Partial update. For nullable fields an explicit `null` clears the value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReminderRequest {
    pub service_type: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub due_date: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub due_mileage: Option<Option<i32>>,
    pub priority: Option<String>,
    pub status: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub notes: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub estimated_cost: Option<Option<Decimal>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub service_provider: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub recurring_interval: Option<Option<String>>,
}

impl UpdateReminderRequest {
    /// Both due fields explicitly nulled in the same request
    pub fn clears_both_due_fields(&self) -> bool {
        matches!(self.due_date, Some(None)) && matches!(self.due_mileage, Some(None))
    }

    /// Status being set, if any
    pub fn new_status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Merge into the stored reminder
    pub fn apply_to(self, reminder: &mut ServiceReminder) -> AppResult<()> {
        if let Some(service_type) = self.service_type {
            if service_type.trim().is_empty() {
                return Err(AppError::BadRequest("serviceType cannot be empty".to_string()));
            }
            reminder.service_type = service_type.trim().to_string();
        }
        if let Some(due_date) = self.due_date {
            reminder.due_date = due_date
                .map(|d| validate_datetime(&d))
                .transpose()
                .map_err(|e| field_error("dueDate", e))?;
        }
        if let Some(due_mileage) = self.due_mileage {
            if due_mileage.map_or(false, |m| m < 0) {
                return Err(AppError::BadRequest("dueMileage cannot be negative".to_string()));
            }
            reminder.due_mileage = due_mileage;
        }
        if reminder.due_date.is_none() && reminder.due_mileage.is_none() {
            return Err(AppError::BadRequest(
                "Either dueDate or dueMileage must be provided".to_string(),
            ));
        }
        if let Some(priority) = self.priority {
            validate_enum(&priority, PRIORITIES).map_err(|e| field_error("priority", e))?;
            reminder.priority = priority;
        }
        if let Some(status) = self.status {
            validate_enum(&status, STORED_STATUSES).map_err(|e| field_error("status", e))?;
            reminder.status = status;
        }
        if let Some(notes) = self.notes {
            reminder.notes = notes;
        }
        if let Some(cost) = self.estimated_cost {
            if cost.map_or(false, |c| c.is_sign_negative()) {
                return Err(AppError::BadRequest("estimatedCost cannot be negative".to_string()));
            }
            reminder.estimated_cost = cost;
        }
        if let Some(provider) = self.service_provider {
            reminder.service_provider = provider;
        }
        if let Some(interval) = self.recurring_interval {
            reminder.recurring_interval = interval.filter(|i| !i.trim().is_empty());
        }
        Ok(())
    }
}

#[serde_as]
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompleteReminderRequest {
    pub actual_service_date: Option<String>,
    #[serde(default)]
    #[serde_as(as = "PickFirst<(_, NoneAsEmptyString)>")]
    #[validate(range(min = 0))]
    pub actual_service_mileage: Option<i32>,
    pub notes: Option<String>,
}

/// Checked completion details
#[derive(Debug, Clone, Default)]
pub struct Completion {
    pub actual_service_date: Option<DateTime<Utc>>,
    pub actual_service_mileage: Option<i32>,
    pub notes: Option<String>,
}

impl CompleteReminderRequest {
    pub fn into_completion(self) -> AppResult<Completion> {
        self.validate()?;
        let actual_service_date = self
            .actual_service_date
            .filter(|d| !d.trim().is_empty())
            .map(|d| validate_datetime(&d))
            .transpose()
            .map_err(|e| field_error("actualServiceDate", e))?;
        Ok(Completion {
            actual_service_date,
            actual_service_mileage: self.actual_service_mileage,
            notes: self.notes.filter(|n| !n.trim().is_empty()),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoGenerateResponse {
    pub message: String,
    pub reminders_created: u32,
}
