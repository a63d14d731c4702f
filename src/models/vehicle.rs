//! Vehicle model
//!
//! Maps the `vehicles` table. Enumerated columns are stored as text and
//! checked against the allowed names on the way in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const FUEL_TYPES: &[&str] = &["Petrol", "Diesel", "Electric", "Hybrid"];

pub const VEHICLE_TYPES: &[&str] = &[
    "Sedan",
    "SUV",
    "Truck",
    "Hatchback",
    "Coupe",
    "Van",
    "Motorcycle",
];

pub const VEHICLE_STATUSES: &[&str] = &["Active", "Inactive"];

pub const DEFAULT_VEHICLE_STATUS: &str = "Active";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: Uuid,
    pub registration_number: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub fuel_type: String,
    pub vehicle_type: String,
    pub color: Option<String>,
    pub status: String,
    pub mileage: i32,
    pub last_service_mileage: i32,
    /// Owner row id, not the `OWN…` business id
    #[serde(rename = "owner")]
    pub owner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields a reminder listing shows about its vehicle
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct VehicleSummary {
    pub make: String,
    pub model: String,
    pub registration_number: String,
    pub mileage: i32,
}
