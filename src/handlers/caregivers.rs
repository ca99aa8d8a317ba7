// src/handlers/caregivers.rs
// DOCUMENTATION: HTTP handlers for the caregiver directory
// PURPOSE: Keyset listing and bulk employment status updates

use crate::auth::require_user;
use crate::config::Config;
use crate::errors::ApiError;
use crate::handlers::ok;
use crate::models::{BulkStatusRequest, CaregiverListQuery};
use crate::services::CaregiverService;
use actix_web::{web, HttpRequest, Responder};
use sqlx::PgPool;

/// GET /api/caregivers
pub async fn list_caregivers(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: HttpRequest,
    query: web::Query<CaregiverListQuery>,
) -> Result<impl Responder, ApiError> {
    let user = require_user(pool.get_ref(), config.get_ref(), &req).await?;
    let page = CaregiverService::list(pool.get_ref(), &user, query.into_inner()).await?;
    Ok(ok(page))
}

/// POST /api/caregivers/bulk-status
/// Always 200; per-item failures are reported in the batch result
pub async fn bulk_update_status(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: HttpRequest,
    body: web::Json<BulkStatusRequest>,
) -> Result<impl Responder, ApiError> {
    let user = require_user(pool.get_ref(), config.get_ref(), &req).await?;
    let batch =
        CaregiverService::bulk_update_status(pool.get_ref(), &user, body.into_inner()).await?;
    Ok(ok(batch))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/caregivers")
            .route("", web::get().to(list_caregivers))
            .route("/bulk-status", web::post().to(bulk_update_status)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::extractor_config;
    use crate::handlers::test_support::app_state;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::json;

    #[actix_rt::test]
    async fn test_malformed_bulk_body_uses_error_envelope() {
        let (pool, config, store) = app_state();
        let app = test::init_service(
            App::new()
                .app_data(pool)
                .app_data(config)
                .app_data(store)
                .configure(extractor_config)
                .configure(super::config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/caregivers/bulk-status")
            .set_json(json!({ "caregiverIds": "all", "employmentStatus": "ACTIVE" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "INVALID_INPUT");
    }

    #[actix_rt::test]
    async fn test_caregivers_require_session() {
        let (pool, config, store) = app_state();
        let app = test::init_service(
            App::new()
                .app_data(pool)
                .app_data(config)
                .app_data(store)
                .configure(super::config),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/caregivers?limit=10")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
