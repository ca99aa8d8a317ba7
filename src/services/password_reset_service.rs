// src/services/password_reset_service.rs
// DOCUMENTATION: Forgot-password flow
// PURPOSE: Issue single-use reset tokens without revealing which emails exist

use crate::config::Config;
use crate::db::AccountRepository;
use crate::errors::ApiError;
use crate::models::ForgotPasswordRequest;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Same response whether or not the account exists
pub const FORGOT_PASSWORD_MESSAGE: &str =
    "If an account with that email exists, a password reset link has been sent.";

pub const RESET_TOKEN_TTL_HOURS: i64 = 1;

/// 64 lowercase hex characters from two random v4 UUIDs
pub fn generate_reset_token() -> String {
    format!(
        "{}{}",
        Uuid::new_v4().simple(),
        Uuid::new_v4().simple()
    )
}

/// Reset link for local inspection; never built in production so tokens
/// stay out of production logs
pub fn preview_link(config: &Config, token: &str) -> Option<String> {
    (!config.is_production()).then(|| reset_link(&config.app_base_url, token))
}

pub fn reset_link(app_base_url: &str, token: &str) -> String {
    format!(
        "{}/auth/reset-password?token={}",
        app_base_url.trim_end_matches('/'),
        token
    )
}

pub struct PasswordResetService;

impl PasswordResetService {
    /// Validate the request and, for a known account, store a fresh token
    pub async fn request_reset(
        pool: &PgPool,
        config: &Config,
        req: ForgotPasswordRequest,
    ) -> Result<(), ApiError> {
        req.validate()?;
        let email = req.normalized_email();

        let user = match AccountRepository::find_by_email(pool, &email).await? {
            Some(user) => user,
            None => {
                log::debug!("Password reset requested for unknown email");
                return Ok(());
            }
        };

        let token = generate_reset_token();
        let expires_at = Utc::now() + Duration::hours(RESET_TOKEN_TTL_HOURS);
        AccountRepository::store_reset_token(pool, user.id, &token, expires_at).await?;

        // Delivery is handled outside this service
        log::info!("Password reset token issued for user {}", user.id);
        if let Some(link) = preview_link(config, &token) {
            log::debug!("Password reset preview link: {}", link);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_token_shape() {
        let token = generate_reset_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(token, generate_reset_token());
    }

    #[test]
    fn test_reset_link() {
        assert_eq!(
            reset_link("https://app.example.com/", "abc"),
            "https://app.example.com/auth/reset-password?token=abc"
        );
        assert_eq!(
            reset_link("http://localhost:5000", "abc"),
            "http://localhost:5000/auth/reset-password?token=abc"
        );
    }

    #[test]
    fn test_preview_link_is_withheld_in_production() {
        let mut config = Config::for_tests();
        assert_eq!(
            preview_link(&config, "abc").as_deref(),
            Some("http://localhost:5000/auth/reset-password?token=abc")
        );

        config.environment = "production".into();
        assert_eq!(preview_link(&config, "abc"), None);
    }
}
