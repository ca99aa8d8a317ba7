// src/handlers/auth.rs
// DOCUMENTATION: HTTP handlers for account recovery
// PURPOSE: Rate-limited forgot-password endpoint

use crate::config::Config;
use crate::errors::ApiError;
use crate::handlers::message;
use crate::models::ForgotPasswordRequest;
use crate::services::{
    client_ip, PasswordResetService, RateLimitPolicy, SharedRateLimitStore,
    FORGOT_PASSWORD_MESSAGE,
};
use actix_web::{http::StatusCode, web, HttpRequest, Responder};
use sqlx::PgPool;

/// POST /api/auth/forgot-password
/// The rate limit is charged before the body is even parsed; an address that
/// already used its budget is turned away without being counted again
pub async fn forgot_password(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    store: web::Data<SharedRateLimitStore>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<impl Responder, ApiError> {
    RateLimitPolicy::FORGOT_PASSWORD
        .enforce_unless_exhausted(store.get_ref(), &client_ip(&req))
        .await?;

    let payload: ForgotPasswordRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::InvalidInput(format!("Invalid request body: {}", e)))?;

    PasswordResetService::request_reset(pool.get_ref(), config.get_ref(), payload).await?;
    Ok(message(StatusCode::OK, FORGOT_PASSWORD_MESSAGE))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/auth").route("/forgot-password", web::post().to(forgot_password)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::app_state;
    use actix_web::{test, App};
    use serde_json::json;

    #[actix_rt::test]
    async fn test_forgot_password_rate_limited_per_ip() {
        let (pool, config, store) = app_state();
        let app = test::init_service(
            App::new()
                .app_data(pool)
                .app_data(config)
                .app_data(store)
                .configure(super::config),
        )
        .await;

        // Invalid emails are rejected before any database access
        for _ in 0..5 {
            let req = test::TestRequest::post()
                .uri("/api/auth/forgot-password")
                .insert_header(("X-Forwarded-For", "203.0.113.7"))
                .set_json(json!({ "email": "not-an-email" }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        }

        let req = test::TestRequest::post()
            .uri("/api/auth/forgot-password")
            .insert_header(("X-Forwarded-For", "203.0.113.7"))
            .set_json(json!({ "email": "not-an-email" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(resp.headers().contains_key("retry-after"));

        // A different client still has budget
        let req = test::TestRequest::post()
            .uri("/api/auth/forgot-password")
            .insert_header(("X-Forwarded-For", "198.51.100.2"))
            .set_json(json!({ "email": "not-an-email" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_rt::test]
    async fn test_forgot_password_validation_details() {
        let (pool, config, store) = app_state();
        let app = test::init_service(
            App::new()
                .app_data(pool)
                .app_data(config)
                .app_data(store)
                .configure(super::config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/auth/forgot-password")
            .set_json(json!({ "email": "bad" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["details"]["email"].is_array());
    }
}
