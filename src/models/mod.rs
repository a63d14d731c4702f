//! Data models
//!
//! Row types mapping the PostgreSQL tables.

pub mod inventory;
pub mod owner;
pub mod service_reminder;
pub mod user;
pub mod vehicle;

pub use inventory::InventoryItem;
pub use owner::Owner;
pub use service_reminder::{ReminderWithVehicle, ServiceReminder};
pub use user::AdminUser;
pub use vehicle::{Vehicle, VehicleSummary};
