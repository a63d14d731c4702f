//! Owner model

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const GENDERS: &[&str] = &["Male", "Female", "Other"];

/// Minimum owner age in years
pub const MIN_OWNER_AGE: i32 = 18;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Owner {
    pub id: Uuid,
    pub owner_id: String,
    pub name: String,
    pub contact: String,
    pub address: String,
    pub license_number: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub email: Option<String>,
    pub vehicles: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New business id: `OWN` followed by eight digits
pub fn generate_owner_id() -> String {
    let number: u32 = rand::thread_rng().gen_range(10_000_000..100_000_000);
    format!("OWN{}", number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_owner_id_format() {
        for _ in 0..50 {
            let id = generate_owner_id();
            assert!(id.starts_with("OWN"));
            assert_eq!(id.len(), 11);
            assert!(id[3..].chars().all(|c| c.is_ascii_digit()));
            assert_ne!(&id[3..4], "0");
        }
    }
}
