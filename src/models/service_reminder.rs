//! Service reminder model
//!
//! "Overdue" is never stored. A reminder is overdue while it is pending and
//! either its due date has passed or the vehicle has reached its due mileage.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{ser, Deserialize, Serialize, Serializer};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::models::vehicle::VehicleSummary;

pub const PRIORITIES: &[&str] = &["Low", "Medium", "High"];
pub const DEFAULT_PRIORITY: &str = "Medium";

pub const STATUS_PENDING: &str = "Pending";
pub const STATUS_COMPLETED: &str = "Completed";
pub const STORED_STATUSES: &[&str] = &[STATUS_PENDING, STATUS_COMPLETED];

/// Service type and cadence used by automatic reminder generation
pub const AUTO_SERVICE_TYPE: &str = "Oil Change";
pub const AUTO_RECURRING_INTERVAL: &str = "6 months";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ServiceReminder {
    pub id: Uuid,
    #[serde(rename = "vehicle")]
    pub vehicle_id: Uuid,
    pub service_type: String,
    pub due_date: Option<DateTime<Utc>>,
    pub due_mileage: Option<i32>,
    pub priority: String,
    pub status: String,
    pub notes: Option<String>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub estimated_cost: Option<Decimal>,
    pub service_provider: Option<String>,
    pub recurring_interval: Option<String>,
    pub is_system_generated: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub actual_service_date: Option<DateTime<Utc>>,
    pub actual_service_mileage: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ServiceReminder {
    pub fn is_pending(&self) -> bool {
        self.status == STATUS_PENDING
    }

    /// Pending and past its due date or due mileage
    pub fn is_overdue(&self, vehicle_mileage: i32, now: DateTime<Utc>) -> bool {
        if !self.is_pending() {
            return false;
        }
        let date_due = self.due_date.map_or(false, |due| due <= now);
        let mileage_due = self.due_mileage.map_or(false, |due| due <= vehicle_mileage);
        date_due || mileage_due
    }
}

/// Reminder joined with the vehicle it belongs to.
///
/// Serializes as the reminder with `vehicle` expanded from an id into
/// `{id, make, model, registrationNumber, mileage}`.
#[derive(Debug, Clone, FromRow)]
pub struct ReminderWithVehicle {
    #[sqlx(flatten)]
    pub reminder: ServiceReminder,
    #[sqlx(flatten)]
    pub vehicle_details: VehicleSummary,
}

#[derive(Serialize)]
struct PopulatedVehicle<'a> {
    id: Uuid,
    #[serde(flatten)]
    summary: &'a VehicleSummary,
}

impl Serialize for ReminderWithVehicle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut value = serde_json::to_value(&self.reminder).map_err(ser::Error::custom)?;
        let vehicle = serde_json::to_value(PopulatedVehicle {
            id: self.reminder.vehicle_id,
            summary: &self.vehicle_details,
        })
        .map_err(ser::Error::custom)?;
        if let Some(fields) = value.as_object_mut() {
            fields.insert("vehicle".to_string(), vehicle);
        }
        value.serialize(serializer)
    }
}

impl ReminderWithVehicle {
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.reminder.is_overdue(self.vehicle_details.mileage, now)
    }
}

/// Projection served by the overdue details endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverdueReminderDetail {
    pub id: Uuid,
    pub service_type: String,
    pub due_date: Option<DateTime<Utc>>,
    pub due_mileage: Option<i32>,
    pub priority: String,
    pub vehicle: VehicleSummary,
}

impl From<ReminderWithVehicle> for OverdueReminderDetail {
    fn from(row: ReminderWithVehicle) -> Self {
        Self {
            id: row.reminder.id,
            service_type: row.reminder.service_type,
            due_date: row.reminder.due_date,
            due_mileage: row.reminder.due_mileage,
            priority: row.reminder.priority,
            vehicle: row.vehicle_details,
        }
    }
}

/// Status accepted by the by-status listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderStatusFilter {
    Pending,
    Completed,
    Overdue,
}

impl ReminderStatusFilter {
    pub const VALID: &'static [&'static str] = &["Pending", "Completed", "Overdue"];
}

impl FromStr for ReminderStatusFilter {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Completed" => Ok(Self::Completed),
            "Overdue" => Ok(Self::Overdue),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ReminderStatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::Overdue => "Overdue",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn reminder(due_date: Option<DateTime<Utc>>, due_mileage: Option<i32>) -> ServiceReminder {
        let now = Utc::now();
        ServiceReminder {
            id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            service_type: "Oil Change".to_string(),
            due_date,
            due_mileage,
            priority: DEFAULT_PRIORITY.to_string(),
            status: STATUS_PENDING.to_string(),
            notes: None,
            estimated_cost: None,
            service_provider: None,
            recurring_interval: None,
            is_system_generated: false,
            completed_at: None,
            actual_service_date: None,
            actual_service_mileage: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_overdue_by_date() {
        let now = Utc::now();
        assert!(reminder(Some(now - Duration::days(1)), None).is_overdue(0, now));
        assert!(reminder(Some(now), None).is_overdue(0, now));
        assert!(!reminder(Some(now + Duration::days(1)), None).is_overdue(0, now));
    }

    #[test]
    fn test_overdue_by_mileage() {
        let now = Utc::now();
        let r = reminder(None, Some(50_000));
        assert!(!r.is_overdue(49_999, now));
        assert!(r.is_overdue(50_000, now));
    }

    #[test]
    fn test_completed_is_never_overdue() {
        let now = Utc::now();
        let mut r = reminder(Some(now - Duration::days(30)), Some(10));
        r.status = STATUS_COMPLETED.to_string();
        assert!(!r.is_overdue(1_000_000, now));
    }

    #[test]
    fn test_status_filter_parse() {
        assert_eq!("Overdue".parse(), Ok(ReminderStatusFilter::Overdue));
        assert_eq!("Pending".parse(), Ok(ReminderStatusFilter::Pending));
        assert!("pending".parse::<ReminderStatusFilter>().is_err());
        assert_eq!(ReminderStatusFilter::Completed.to_string(), "Completed");
    }

    #[test]
    fn test_serialized_names() {
        let r = reminder(None, Some(1000));
        let json = serde_json::to_value(&r).unwrap();
        assert!(json.get("vehicle").is_some());
        assert_eq!(json["dueMileage"], 1000);
        assert_eq!(json["isSystemGenerated"], false);
        assert!(json["estimatedCost"].is_null());
    }

    #[test]
    fn test_listing_expands_vehicle() {
        let r = reminder(None, Some(1000));
        let vehicle_id = r.vehicle_id;
        let row = ReminderWithVehicle {
            reminder: r,
            vehicle_details: VehicleSummary {
                make: "Toyota".into(),
                model: "Axio".into(),
                registration_number: "CAB-1234".into(),
                mileage: 84_000,
            },
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["vehicle"]["id"], vehicle_id.to_string());
        assert_eq!(json["vehicle"]["make"], "Toyota");
        assert_eq!(json["vehicle"]["registrationNumber"], "CAB-1234");
        assert_eq!(json["serviceType"], "Oil Change");
        assert!(json.get("vehicleDetails").is_none());
    }
}
