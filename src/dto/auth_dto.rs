use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::user::AdminUser;

#[derive(Debug, Default, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be at least 3 characters"))]
    pub username: Option<String>,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 6, max = 128, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,
}

/// `email` may also carry the username
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    pub fn identifier(&self) -> Option<&str> {
        self.email
            .as_deref()
            .or(self.username.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub expires_in: u64,
    pub user: AdminUser,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_prefers_email() {
        let request = LoginRequest {
            email: Some(" admin@fleet.lk ".into()),
            username: Some("admin".into()),
            password: None,
        };
        assert_eq!(request.identifier(), Some("admin@fleet.lk"));

        let by_name = LoginRequest {
            username: Some("admin".into()),
            ..Default::default()
        };
        assert_eq!(by_name.identifier(), Some("admin"));
        assert_eq!(LoginRequest::default().identifier(), None);
    }

    #[test]
    fn test_register_validation() {
        let short = RegisterRequest {
            username: Some("ab".into()),
            email: Some("admin@fleet.lk".into()),
            password: Some("secret1".into()),
        };
        assert!(short.validate().is_err());

        let ok = RegisterRequest {
            username: Some("fleetadmin".into()),
            email: Some("admin@fleet.lk".into()),
            password: Some("secret1".into()),
        };
        assert!(ok.validate().is_ok());
    }
}
