// src/models/account.rs
// DOCUMENTATION: User account records and password reset DTOs
// PURPOSE: Shapes used by session lookup and /api/auth routes

use serde::Deserialize;
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Session joined with its user
#[derive(Debug, FromRow)]
pub struct SessionUserRow {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
}

/// Minimal user projection returned by lookups by email
#[derive(Debug, FromRow)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub role: String,
}

/// Body of POST /api/auth/forgot-password
#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

impl ForgotPasswordRequest {
    pub fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forgot_password_normalizes_email() {
        let req = ForgotPasswordRequest {
            email: "  Dana@Example.COM ".into(),
        };
        assert_eq!(req.normalized_email(), "dana@example.com");
    }

    #[test]
    fn test_forgot_password_rejects_bad_email() {
        let req = ForgotPasswordRequest {
            email: "not an email".into(),
        };
        assert!(req.validate().is_err());
    }
}
