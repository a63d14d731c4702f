//! Next service date prediction
//!
//! The model lives outside the service: a Python script is run with the
//! vehicle figures as arguments and prints a date on stdout.

use async_trait::async_trait;
use chrono::{DateTime, Months, Utc};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config::environment::PredictionConfig;
use crate::models::vehicle::Vehicle;
use crate::utils::validation::validate_datetime;

/// Months added to "now" when the predictor cannot be run
pub const FALLBACK_MONTHS: u32 = 3;

#[async_trait]
pub trait ServiceDatePredictor: Send + Sync {
    /// Never fails: problems are logged and a fallback date is returned
    async fn predict(&self, vehicle: &Vehicle, service_type: &str) -> DateTime<Utc>;
}

pub struct ScriptPredictor {
    config: PredictionConfig,
}

impl ScriptPredictor {
    pub fn new(config: PredictionConfig) -> Self {
        Self { config }
    }

    fn command(&self, vehicle: &Vehicle, service_type: &str) -> Command {
        let mut command = Command::new(&self.config.python);
        command
            .arg(&self.config.script_path)
            .arg(&self.config.model_path)
            .arg(vehicle.mileage.to_string())
            .arg(vehicle.last_service_mileage.to_string())
            .arg(service_type)
            .arg(&vehicle.make)
            .arg(vehicle.year.to_string())
            .kill_on_drop(true);
        command
    }
}

#[async_trait]
impl ServiceDatePredictor for ScriptPredictor {
    async fn predict(&self, vehicle: &Vehicle, service_type: &str) -> DateTime<Utc> {
        let mut command = self.command(vehicle, service_type);
        debug!(
            "🔮 Predicting {} for {} ({} km)",
            service_type, vehicle.registration_number, vehicle.mileage
        );

        match timeout(self.config.timeout, command.output()).await {
            Err(_) => {
                warn!(
                    "⏱️ Prediction timed out after {:?}, using fallback date",
                    self.config.timeout
                );
                fallback_date(Utc::now())
            }
            Ok(Err(e)) => {
                warn!("⚠️ Could not run predictor {}: {}", self.config.python, e);
                fallback_date(Utc::now())
            }
            Ok(Ok(output)) if !output.status.success() => {
                warn!(
                    "⚠️ Predictor exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                );
                fallback_date(Utc::now())
            }
            Ok(Ok(output)) => parse_prediction(&String::from_utf8_lossy(&output.stdout), Utc::now()),
        }
    }
}

/// Date used when the predictor could not produce an answer
pub fn fallback_date(now: DateTime<Utc>) -> DateTime<Utc> {
    now.checked_add_months(Months::new(FALLBACK_MONTHS)).unwrap_or(now)
}

/// Last non-empty line of the script output. Unparseable output means "now".
pub fn parse_prediction(stdout: &str, now: DateTime<Utc>) -> DateTime<Utc> {
    let line = stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .last()
        .unwrap_or_default();

    match validate_datetime(line) {
        Ok(date) => date,
        Err(_) => {
            warn!("⚠️ Unreadable prediction output {:?}, using current date", line);
            now
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::path::PathBuf;
    use std::time::Duration;
    use uuid::Uuid;

    fn vehicle() -> Vehicle {
        let now = Utc::now();
        Vehicle {
            id: Uuid::new_v4(),
            registration_number: "CAB-1234".into(),
            make: "Toyota".into(),
            model: "Axio".into(),
            year: 2015,
            fuel_type: "Hybrid".into(),
            vehicle_type: "Sedan".into(),
            color: None,
            status: "Active".into(),
            mileage: 84_000,
            last_service_mileage: 79_000,
            owner_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_fallback_is_three_months_ahead() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        assert_eq!(fallback_date(now), Utc.with_ymd_and_hms(2024, 4, 15, 10, 0, 0).unwrap());

        // clamps to the end of a shorter month
        let now = Utc.with_ymd_and_hms(2024, 11, 30, 0, 0, 0).unwrap();
        assert_eq!(fallback_date(now), Utc.with_ymd_and_hms(2025, 2, 28, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_prediction() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            parse_prediction("2024-06-01\n", now),
            Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            parse_prediction("loading model...\n2024-06-01T08:30:00Z\n", now),
            Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap()
        );
        assert_eq!(parse_prediction("not a date", now), now);
        assert_eq!(parse_prediction("", now), now);
    }

    #[tokio::test]
    async fn test_missing_interpreter_falls_back() {
        let predictor = ScriptPredictor::new(PredictionConfig {
            python: "/nonexistent/python3".into(),
            ..PredictionConfig::default()
        });
        let before = fallback_date(Utc::now());
        let predicted = predictor.predict(&vehicle(), "Oil Change").await;
        assert!(predicted >= before);
        assert!(predicted <= fallback_date(Utc::now()));
    }

    #[cfg(unix)]
    fn script(body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("predict-{}.sh", Uuid::new_v4()));
        std::fs::write(&path, body).unwrap();
        path
    }

    #[cfg(unix)]
    fn sh_predictor(script_path: PathBuf, timeout: Duration) -> ScriptPredictor {
        ScriptPredictor::new(PredictionConfig {
            python: "sh".into(),
            script_path,
            model_path: PathBuf::from("model.pkl"),
            timeout,
        })
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_script_output_is_used() {
        // $1 is the model, $2..$6 the vehicle figures
        let path = script("[ \"$5\" = \"Toyota\" ] && [ \"$2\" = \"84000\" ] && echo 2031-05-01\n");
        let predicted = sh_predictor(path.clone(), Duration::from_secs(5))
            .predict(&vehicle(), "Oil Change")
            .await;
        let _ = std::fs::remove_file(path);
        assert_eq!(predicted, Utc.with_ymd_and_hms(2031, 5, 1, 0, 0, 0).unwrap());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_script_falls_back() {
        let path = script("echo boom >&2\nexit 3\n");
        let before = fallback_date(Utc::now());
        let predicted = sh_predictor(path.clone(), Duration::from_secs(5))
            .predict(&vehicle(), "Oil Change")
            .await;
        let _ = std::fs::remove_file(path);
        assert!(predicted >= before);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_slow_script_falls_back() {
        let path = script("sleep 5\necho 2031-05-01\n");
        let before = fallback_date(Utc::now());
        let predicted = sh_predictor(path.clone(), Duration::from_millis(200))
            .predict(&vehicle(), "Oil Change")
            .await;
        let _ = std::fs::remove_file(path);
        assert!(predicted >= before);
        assert!(predicted <= fallback_date(Utc::now()));
    }
}
