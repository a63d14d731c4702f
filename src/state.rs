//! Shared application state
//!
//! Everything a route handler needs to build its controller. Cloned per
//! request by axum, so every field is cheap to clone.

use sqlx::PgPool;
use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::services::notification_service::ReminderNotifier;
use crate::services::prediction_service::{ScriptPredictor, ServiceDatePredictor};
use crate::utils::jwt::JwtConfig;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<EnvironmentConfig>,
    pub jwt: JwtConfig,
    pub predictor: Arc<dyn ServiceDatePredictor>,
    pub notifier: ReminderNotifier,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        let predictor = Arc::new(ScriptPredictor::new(config.prediction.clone()));
        let notifier = ReminderNotifier::new(&config);

        Self {
            pool,
            jwt: JwtConfig::from(&config),
            config: Arc::new(config),
            predictor,
            notifier,
        }
    }

    /// Swap the date predictor, e.g. for a fixed one in tests
    pub fn with_predictor(mut self, predictor: Arc<dyn ServiceDatePredictor>) -> Self {
        self.predictor = predictor;
        self
    }
}
