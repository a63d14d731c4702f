//! Reminder notifications
//!
//! Owners with an e-mail address are told about new and re-opened reminders.
//! Delivery goes through an HTTP mail relay; sending never blocks or fails
//! the request that triggered it.

use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{error, info};

use crate::config::environment::EnvironmentConfig;
use crate::models::service_reminder::ServiceReminder;
use crate::repositories::reminder_repository::NotificationTarget;

/// Payload posted to the relay
#[derive(Debug, Clone, Serialize)]
pub struct ReminderEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
}

impl ReminderEmail {
    pub fn build(from: &str, target: &NotificationTarget, reminder: &ServiceReminder) -> Self {
        let mut text = format!(
            "Service Reminder\n\nVehicle: {} {} ({})\nService Type: {}\n",
            target.make, target.model, target.registration_number, reminder.service_type
        );
        match reminder.due_date {
            Some(due) => text.push_str(&format!("Due Date: {}\n", due.format("%Y-%m-%d"))),
            None => text.push_str("Due Date: Not set\n"),
        }
        if let Some(mileage) = reminder.due_mileage {
            text.push_str(&format!("Due Mileage: {} km\n", mileage));
        }
        text.push_str(&format!("Priority: {}\n", reminder.priority));
        if let Some(notes) = reminder.notes.as_deref().filter(|n| !n.trim().is_empty()) {
            text.push_str(&format!("Notes: {}\n", notes));
        }
        text.push_str("\nThis is an automated reminder from the Vehicle Management System.\n");

        Self {
            from: from.to_string(),
            to: target.email.clone(),
            subject: format!(
                "Service Reminder: {} for {} {}",
                reminder.service_type, target.make, target.model
            ),
            text,
        }
    }
}

#[derive(Clone)]
pub struct ReminderNotifier {
    client: Client,
    webhook_url: Option<String>,
    from: String,
}

impl ReminderNotifier {
    pub fn new(config: &EnvironmentConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            client,
            webhook_url: config.notify_webhook_url.clone(),
            from: config.notify_from.clone(),
        }
    }

    /// Send in the background
    pub fn notify(&self, target: &NotificationTarget, reminder: &ServiceReminder) {
        let email = ReminderEmail::build(&self.from, target, reminder);

        let Some(url) = self.webhook_url.clone() else {
            info!("📧 (no relay configured) {} -> {}", email.subject, email.to);
            return;
        };

        let client = self.client.clone();
        tokio::spawn(async move {
            let result = client
                .post(&url)
                .json(&email)
                .send()
                .await
                .and_then(|response| response.error_for_status());

            match result {
                Ok(_) => info!("📧 Service reminder sent to {}", email.to),
                Err(e) => error!("❌ Error sending service reminder to {}: {}", email.to, e),
            }
        });
    }
}
