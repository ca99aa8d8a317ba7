// src/handlers/health.rs
// DOCUMENTATION: Health check handler
// PURPOSE: Report service status and database reachability

use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use std::time::Duration;

const DB_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

async fn database_reachable(pool: &PgPool) -> bool {
    match tokio::time::timeout(DB_PROBE_TIMEOUT, sqlx::query("SELECT 1").execute(pool)).await {
        Ok(Ok(_)) => true,
        Ok(Err(e)) => {
            log::warn!("Health check database query failed: {}", e);
            false
        }
        Err(_) => {
            log::warn!("Health check database query timed out");
            false
        }
    }
}

/// GET /api/health
pub async fn health_check(pool: web::Data<PgPool>) -> impl Responder {
    let connected = database_reachable(pool.get_ref()).await;
    let body = json!({
        "status": if connected { "ok" } else { "degraded" },
        "service": "carelink-api",
        "version": env!("CARGO_PKG_VERSION"),
        "database": if connected { "connected" } else { "disconnected" }
    });

    if connected {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/health", web::get().to(health_check));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::lazy_test_pool;
    use actix_web::{http::StatusCode, test, App};

    #[actix_rt::test]
    async fn test_health_reports_unreachable_database() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_test_pool()))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["service"], "carelink-api");
        assert_eq!(body["database"], "disconnected");
    }
}
