//! Validation helpers
//!
//! Field-presence checks, format validators used by the request DTOs and
//! conversion of incoming strings into typed values.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use uuid::Uuid;
use validator::ValidationError;

use crate::utils::errors::{AppError, AppResult};

lazy_static! {
    static ref CONTACT_RE: Regex = Regex::new(r"^\d{10}$").unwrap();
    static ref LICENSE_RE: Regex = Regex::new(r"^(B\d{7}|NEW\d{7})$").unwrap();
    static ref OLD_LICENSE_RE: Regex = Regex::new(r"^[A-Z]{2}\d{13}$").unwrap();
}

/// Something that may or may not carry a usable value
pub trait Present {
    fn is_present(&self) -> bool;
}

impl Present for Option<String> {
    fn is_present(&self) -> bool {
        self.as_deref().map_or(false, |s| !s.trim().is_empty())
    }
}

impl Present for Option<i32> {
    fn is_present(&self) -> bool {
        self.is_some()
    }
}

/// Collects the names of required fields that were not supplied
#[derive(Debug, Default)]
pub struct RequiredFields {
    missing: Vec<&'static str>,
}

impl RequiredFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check<T: Present>(&mut self, name: &'static str, value: &T) -> &mut Self {
        if !value.is_present() {
            self.missing.push(name);
        }
        self
    }

    /// Record a field as missing unconditionally
    pub fn require(&mut self, name: &'static str, present: bool) -> &mut Self {
        if !present {
            self.missing.push(name);
        }
        self
    }

    /// 400 with the list of missing fields
    pub fn finish(&self, message: &str) -> AppResult<()> {
        if self.missing.is_empty() {
            return Ok(());
        }
        Err(AppError::MissingFields {
            message: message.to_string(),
            fields: self.missing.clone(),
        })
    }
}

/// Unwrap a value that `RequiredFields` has already checked
pub fn required<T>(value: Option<T>, name: &str) -> AppResult<T> {
    value.ok_or_else(|| AppError::BadRequest(format!("{} is required", name)))
}

/// Parse a path id, answering 400 with the resource name on failure
pub fn parse_id(value: &str, resource: &str) -> AppResult<Uuid> {
    Uuid::parse_str(value.trim())
        .map_err(|_| AppError::BadRequest(format!("Invalid {} ID", resource)))
}

/// Accept `YYYY-MM-DD` or a full RFC 3339 timestamp as a calendar date
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.date_naive()))
        .map_err(|_| {
            let mut error = ValidationError::new("date");
            error.add_param("value".into(), &value.to_string());
            error.add_param("format".into(), &"YYYY-MM-DD".to_string());
            error
        })
}

/// Accept an RFC 3339 timestamp or a bare `YYYY-MM-DD` (midnight UTC)
pub fn validate_datetime(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    let value = value.trim();
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map(|d| d.and_time(NaiveTime::MIN).and_utc())
        })
        .map_err(|_| {
            let mut error = ValidationError::new("datetime");
            error.add_param("value".into(), &value.to_string());
            error.add_param("format".into(), &"RFC3339".to_string());
            error
        })
}

/// Turn a field-level validation failure into a 400
pub fn field_error(field: &'static str, error: ValidationError) -> AppError {
    let mut errors = validator::ValidationErrors::new();
    errors.add(field, error);
    AppError::Validation(errors)
}

/// Ten-digit contact number
pub fn validate_contact(value: &str) -> Result<(), ValidationError> {
    if !CONTACT_RE.is_match(value) {
        let mut error = ValidationError::new("contact");
        error.message = Some("Contact number must be 10 digits".into());
        return Err(error);
    }
    Ok(())
}

/// `B1234567`, `NEW1234567` or two capitals followed by 13 digits
pub fn validate_license_number(value: &str) -> Result<(), ValidationError> {
    if !LICENSE_RE.is_match(value) && !OLD_LICENSE_RE.is_match(value) {
        let mut error = ValidationError::new("license_number");
        error.message = Some(
            "Invalid license format. Use B1234567, NEW1234567, or XX followed by 13 digits".into(),
        );
        return Err(error);
    }
    Ok(())
}

/// Model year between 1900 and the current year
pub fn validate_model_year(year: i32) -> Result<(), ValidationError> {
    validate_range(year, 1900, Utc::now().year())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Serialize>(
    value: T,
    min: T,
    max: T,
) -> Result<(), ValidationError> {
    if value < min || value > max {
        let mut error = ValidationError::new("range");
        error.add_param("min".into(), &min);
        error.add_param("max".into(), &max);
        error.add_param("actual".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Value must be one of the allowed names
pub fn validate_enum(value: &str, allowed_values: &[&str]) -> Result<(), ValidationError> {
    if !allowed_values.contains(&value) {
        let mut error = ValidationError::new("enum");
        error.add_param("value".into(), &value);
        error.add_param("allowed_values".into(), &allowed_values);
        return Err(error);
    }
    Ok(())
}

pub fn validate_non_negative<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value < T::zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Whole years between `birth` and `today`
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_fields_collects_in_order() {
        let name: Option<String> = Some("Kamal".into());
        let contact: Option<String> = Some("   ".into());
        let year: Option<i32> = None;

        let mut fields = RequiredFields::new();
        fields
            .check("name", &name)
            .check("contact", &contact)
            .check("year", &year);

        match fields.finish("The following fields are required") {
            Err(AppError::MissingFields { fields, .. }) => assert_eq!(fields, vec!["contact", "year"]),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_parse_id() {
        assert!(parse_id("550e8400-e29b-41d4-a716-446655440000", "vehicle").is_ok());
        match parse_id("not-an-id", "vehicle") {
            Err(AppError::BadRequest(msg)) => assert_eq!(msg, "Invalid vehicle ID"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_validate_date_accepts_iso_timestamp() {
        assert_eq!(
            validate_date("1990-05-17").unwrap(),
            NaiveDate::from_ymd_opt(1990, 5, 17).unwrap()
        );
        assert_eq!(
            validate_date("1990-05-17T00:00:00.000Z").unwrap(),
            NaiveDate::from_ymd_opt(1990, 5, 17).unwrap()
        );
        assert!(validate_date("17/05/1990").is_err());
    }

    #[test]
    fn test_validate_datetime() {
        assert!(validate_datetime("2025-03-01T10:00:00Z").is_ok());
        let midnight = validate_datetime("2025-03-01").unwrap();
        assert_eq!(midnight.to_rfc3339(), "2025-03-01T00:00:00+00:00");
        assert!(validate_datetime("tomorrow").is_err());
    }

    #[test]
    fn test_validate_contact() {
        assert!(validate_contact("0771234567").is_ok());
        assert!(validate_contact("077123456").is_err());
        assert!(validate_contact("07712345a7").is_err());
    }

    #[test]
    fn test_validate_license_number() {
        assert!(validate_license_number("B1234567").is_ok());
        assert!(validate_license_number("NEW1234567").is_ok());
        assert!(validate_license_number("AB1234567890123").is_ok());
        assert!(validate_license_number("C1234567").is_err());
        assert!(validate_license_number("ab1234567890123").is_err());
    }

    #[test]
    fn test_validate_model_year() {
        assert!(validate_model_year(1900).is_ok());
        assert!(validate_model_year(Utc::now().year()).is_ok());
        assert!(validate_model_year(1899).is_err());
        assert!(validate_model_year(Utc::now().year() + 1).is_err());
    }

    #[test]
    fn test_validate_enum() {
        let allowed = ["Active", "Inactive"];
        assert!(validate_enum("Active", &allowed).is_ok());
        assert!(validate_enum("active", &allowed).is_err());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative(0).is_ok());
        assert!(validate_non_negative(-1).is_err());
    }

    #[test]
    fn test_age_on_birthday_boundary() {
        let birth = NaiveDate::from_ymd_opt(2000, 6, 15).unwrap();
        assert_eq!(age_on(birth, NaiveDate::from_ymd_opt(2018, 6, 14).unwrap()), 17);
        assert_eq!(age_on(birth, NaiveDate::from_ymd_opt(2018, 6, 15).unwrap()), 18);
    }
}
