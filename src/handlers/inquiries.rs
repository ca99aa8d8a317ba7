// src/handlers/inquiries.rs
// DOCUMENTATION: HTTP handlers for placement inquiries
// PURPOSE: Parse requests, resolve the session user, call InquiryService

use crate::auth::require_user;
use crate::config::Config;
use crate::errors::ApiError;
use crate::handlers::{ok, success};
use crate::models::{CreateInquiryRequest, InquiryListQuery, UpdateInquiryRequest};
use crate::services::InquiryService;
use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;

/// GET /api/inquiries
pub async fn list_inquiries(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: HttpRequest,
    query: web::Query<InquiryListQuery>,
) -> Result<impl Responder, ApiError> {
    let user = require_user(pool.get_ref(), config.get_ref(), &req).await?;
    let result = InquiryService::list(pool.get_ref(), &user, query.into_inner()).await?;
    Ok(ok(result))
}

/// POST /api/inquiries
pub async fn create_inquiry(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: HttpRequest,
    body: web::Json<CreateInquiryRequest>,
) -> Result<impl Responder, ApiError> {
    let user = require_user(pool.get_ref(), config.get_ref(), &req).await?;
    let inquiry = InquiryService::create(pool.get_ref(), &user, body.into_inner()).await?;
    Ok(success(StatusCode::CREATED, inquiry))
}

/// GET /api/inquiries/{id}
pub async fn get_inquiry(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<impl Responder, ApiError> {
    let user = require_user(pool.get_ref(), config.get_ref(), &req).await?;
    let inquiry = InquiryService::get(pool.get_ref(), &user, path.into_inner()).await?;
    Ok(ok(inquiry))
}

/// PATCH /api/inquiries/{id}
pub async fn update_inquiry(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    body: web::Json<UpdateInquiryRequest>,
) -> Result<impl Responder, ApiError> {
    let user = require_user(pool.get_ref(), config.get_ref(), &req).await?;
    let inquiry =
        InquiryService::update(pool.get_ref(), &user, path.into_inner(), body.into_inner())
            .await?;
    Ok(ok(inquiry))
}

/// DELETE /api/inquiries/{id}
pub async fn delete_inquiry(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<impl Responder, ApiError> {
    let user = require_user(pool.get_ref(), config.get_ref(), &req).await?;
    InquiryService::delete(pool.get_ref(), &user, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/inquiries")
            .route("", web::get().to(list_inquiries))
            .route("", web::post().to(create_inquiry))
            .route("/{id}", web::get().to(get_inquiry))
            .route("/{id}", web::patch().to(update_inquiry))
            .route("/{id}", web::delete().to(delete_inquiry)),
    );
}
