// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for entire application

use crate::config::Config;
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::{json, Map, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use validator::ValidationErrors;

/// Application-specific error types
/// DOCUMENTATION: Each variant maps to one HTTP status code and error code
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Access denied: {0}")]
    Forbidden(String),

    #[error("Validation failed")]
    Validation(#[from] ValidationErrors),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Conflict: {0}")]
    #[allow(dead_code)]
    Conflict(String),

    #[error("Rate limit exceeded, retry in {retry_after_secs}s")]
    RateLimitExceeded { limit: u32, retry_after_secs: u64 },

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error: {0}")]
    #[allow(dead_code)]
    Internal(String),

    #[error("Service temporarily unavailable")]
    #[allow(dead_code)]
    ServiceUnavailable,
}

impl ApiError {
    pub fn forbidden(reason: impl Into<String>) -> Self {
        ApiError::Forbidden(reason.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        ApiError::NotFound(what.into())
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::RateLimitExceeded { .. } => "RATE_LIMIT_EXCEEDED",
            ApiError::DatabaseError(_) => "DATABASE_ERROR",
            ApiError::Internal(_) => "INTERNAL_ERROR",
            ApiError::ServiceUnavailable => "SERVICE_UNAVAILABLE",
        }
    }

    /// Message shown to clients. Driver messages of server-side failures
    /// are only shown when `expose_internal` is set.
    fn public_message(&self, expose_internal: bool) -> String {
        match self {
            ApiError::DatabaseError(_) | ApiError::Internal(_) if !expose_internal => {
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Whether 5xx bodies carry the underlying error message; off until startup
/// decides otherwise
static EXPOSE_INTERNAL_ERRORS: AtomicBool = AtomicBool::new(false);

/// Apply the environment policy from `Config` to every error response
pub fn configure(config: &Config) {
    EXPOSE_INTERNAL_ERRORS.store(!config.is_production(), Ordering::Relaxed);
}

/// `contact_email` -> `contactEmail`, matching request bodies
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = !out.is_empty();
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Flatten validator errors into `{ fieldName: [message, ...] }`
fn field_errors(errors: &ValidationErrors) -> Value {
    let mut fields = Map::new();
    for (field, errs) in errors.field_errors() {
        let messages: Vec<Value> = errs
            .iter()
            .map(|e| {
                let msg = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("invalid value ({})", e.code));
                Value::String(msg)
            })
            .collect();
        fields.insert(camel_case(field), Value::Array(messages));
    }
    Value::Object(fields)
}

/// Convert ApiError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and JSON responses
impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("Request failed: {}", self);
        }

        let mut error = json!({
            "code": self.code(),
            "message": self.public_message(EXPOSE_INTERNAL_ERRORS.load(Ordering::Relaxed)),
            "timestamp": chrono::Utc::now().to_rfc3339()
        });
        if let ApiError::Validation(errors) = self {
            error["details"] = field_errors(errors);
        }

        let body = json!({
            "success": false,
            "error": error
        });

        let mut builder = HttpResponse::build(status);
        if let ApiError::RateLimitExceeded {
            limit,
            retry_after_secs,
        } = self
        {
            builder
                .insert_header(("Retry-After", retry_after_secs.to_string()))
                .insert_header(("X-RateLimit-Limit", limit.to_string()))
                .insert_header(("X-RateLimit-Reset", retry_after_secs.to_string()));
        }
        builder.json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::RateLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use validator::Validate;

    #[derive(Validate)]
    struct ContactForm {
        #[validate(email(message = "Invalid email address"))]
        contact_email: String,
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::forbidden("nope").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::not_found("Lead").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Conflict("dup".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::DatabaseError("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_rt::test]
    async fn test_rate_limit_response_has_retry_headers() {
        let resp = ApiError::RateLimitExceeded {
            limit: 5,
            retry_after_secs: 42,
        }
        .error_response();

        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(resp.headers().get("Retry-After").unwrap(), "42");
        assert_eq!(resp.headers().get("X-RateLimit-Limit").unwrap(), "5");
        assert_eq!(resp.headers().get("X-RateLimit-Reset").unwrap(), "42");
    }

    #[actix_rt::test]
    async fn test_validation_response_lists_fields() {
        let errors = ContactForm {
            contact_email: "not-an-email".into(),
        }
        .validate()
        .unwrap_err();

        let resp = ApiError::from(errors).error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(
            json["error"]["details"]["contactEmail"][0],
            "Invalid email address"
        );
        assert!(json["error"]["details"].get("contact_email").is_none());
    }

    #[test]
    fn test_camel_case_field_names() {
        assert_eq!(camel_case("email"), "email");
        assert_eq!(camel_case("contact_email"), "contactEmail");
        assert_eq!(camel_case("care_recipient_age"), "careRecipientAge");
        assert_eq!(camel_case("_private"), "private");
    }

    #[test]
    fn test_internal_messages_follow_environment_policy() {
        let err = ApiError::DatabaseError("relation \"users\" does not exist".into());
        assert_eq!(err.public_message(false), "Internal server error");
        assert!(err.public_message(true).contains("relation"));

        // Client errors are always shown as-is
        assert_eq!(
            ApiError::not_found("Lead").public_message(false),
            "Lead not found"
        );

        let mut config = Config::for_tests();
        config.environment = "production".into();
        assert!(config.is_production());
        assert!(!Config::for_tests().is_production());
    }
}
