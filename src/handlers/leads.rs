// src/handlers/leads.rs
// DOCUMENTATION: HTTP handlers for operator lead triage
// PURPOSE: Parse requests, resolve the session user, call LeadService

use crate::auth::require_user;
use crate::config::Config;
use crate::errors::ApiError;
use crate::handlers::ok;
use crate::models::{LeadListQuery, UpdateLeadRequest};
use crate::services::{client_ip, LeadService};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;

/// GET /api/operator/leads
pub async fn list_leads(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: HttpRequest,
    query: web::Query<LeadListQuery>,
) -> Result<impl Responder, ApiError> {
    let user = require_user(pool.get_ref(), config.get_ref(), &req).await?;
    let result = LeadService::list(pool.get_ref(), &user, query.into_inner()).await?;
    Ok(ok(result))
}

/// GET /api/operator/leads/{id}
pub async fn get_lead(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<impl Responder, ApiError> {
    let user = require_user(pool.get_ref(), config.get_ref(), &req).await?;
    let lead = LeadService::get(pool.get_ref(), &user, path.into_inner(), &client_ip(&req)).await?;
    Ok(ok(lead))
}

/// PATCH /api/operator/leads/{id}
pub async fn update_lead(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    body: web::Json<UpdateLeadRequest>,
) -> Result<impl Responder, ApiError> {
    let user = require_user(pool.get_ref(), config.get_ref(), &req).await?;
    let lead = LeadService::update(
        pool.get_ref(),
        &user,
        path.into_inner(),
        body.into_inner(),
        &client_ip(&req),
    )
    .await?;
    Ok(ok(lead))
}

/// DELETE /api/operator/leads/{id}
pub async fn delete_lead(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<impl Responder, ApiError> {
    let user = require_user(pool.get_ref(), config.get_ref(), &req).await?;
    LeadService::delete(pool.get_ref(), &user, path.into_inner(), &client_ip(&req)).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/operator/leads")
            .route("", web::get().to(list_leads))
            .route("/{id}", web::get().to(get_lead))
            .route("/{id}", web::patch().to(update_lead))
            .route("/{id}", web::delete().to(delete_lead)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::app_state;
    use actix_web::{http::StatusCode, test, App};

    #[actix_rt::test]
    async fn test_leads_require_session() {
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
            .uri("/api/operator/leads?status=NEW,CONTACTED")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
