//! Services module
//!
//! Integrations with things outside the database: the service date
//! predictor and the reminder notification relay.

pub mod notification_service;
pub mod prediction_service;

pub use notification_service::ReminderNotifier;
pub use prediction_service::{ScriptPredictor, ServiceDatePredictor};
