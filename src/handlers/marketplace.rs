// src/handlers/marketplace.rs
// DOCUMENTATION: HTTP handlers for the caregiver marketplace
// PURPOSE: Public listing search and rate-limited caregiver favorites

use crate::auth::{current_user, AuthenticatedUser};
use crate::config::Config;
use crate::errors::ApiError;
use crate::handlers::{message, ok, success};
use crate::models::{parse_listing_id, FavoriteQuery, FavoriteRequest, ListingQuery};
use crate::services::{
    client_ip, FavoriteService, MarketplaceService, RateLimitPolicy, SharedRateLimitStore,
};
use actix_web::{http::StatusCode, web, HttpRequest, Responder};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

/// GET /api/marketplace/listings
pub async fn list_listings(
    pool: web::Data<PgPool>,
    query: web::Query<ListingQuery>,
) -> Result<impl Responder, ApiError> {
    let result = MarketplaceService::list_listings(pool.get_ref(), query.into_inner()).await?;
    Ok(ok(result))
}

/// GET /api/marketplace/listings/{id}
pub async fn get_listing(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, ApiError> {
    let listing = MarketplaceService::get_listing(pool.get_ref(), path.into_inner()).await?;
    Ok(ok(listing))
}

/// Charge `policy` to the session user, or the client address when anonymous,
/// then require the session
async fn limited_user(
    policy: RateLimitPolicy,
    pool: &PgPool,
    config: &Config,
    store: &SharedRateLimitStore,
    req: &HttpRequest,
) -> Result<AuthenticatedUser, ApiError> {
    let user = current_user(pool, config, req).await?;
    let subject = match &user {
        Some(user) => user.id.to_string(),
        None => client_ip(req),
    };
    policy.enforce(store, &subject).await?;
    user.ok_or(ApiError::Unauthorized)
}

/// GET /api/marketplace/favorites
pub async fn list_favorites(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    store: web::Data<SharedRateLimitStore>,
    req: HttpRequest,
) -> Result<impl Responder, ApiError> {
    let user = limited_user(
        RateLimitPolicy::FAVORITES_LIST,
        pool.get_ref(),
        config.get_ref(),
        store.get_ref(),
        &req,
    )
    .await?;

    let favorites = FavoriteService::list(pool.get_ref(), &user).await?;
    Ok(ok(favorites))
}

/// POST /api/marketplace/favorites
/// 201 for a new favorite, 200 when it already existed
pub async fn add_favorite(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    store: web::Data<SharedRateLimitStore>,
    req: HttpRequest,
    body: Option<web::Json<FavoriteRequest>>,
) -> Result<impl Responder, ApiError> {
    let user = limited_user(
        RateLimitPolicy::FAVORITES_ADD,
        pool.get_ref(),
        config.get_ref(),
        store.get_ref(),
        &req,
    )
    .await?;

    let body = body.map(web::Json::into_inner).unwrap_or_default();
    let listing_id = parse_listing_id(body.listing_id.as_deref())?;

    let created = FavoriteService::add(pool.get_ref(), &user, listing_id).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok(success(status, json!({ "listingId": listing_id })))
}

/// DELETE /api/marketplace/favorites?listingId=
pub async fn remove_favorite(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    store: web::Data<SharedRateLimitStore>,
    req: HttpRequest,
    query: web::Query<FavoriteQuery>,
) -> Result<impl Responder, ApiError> {
    let user = limited_user(
        RateLimitPolicy::FAVORITES_REMOVE,
        pool.get_ref(),
        config.get_ref(),
        store.get_ref(),
        &req,
    )
    .await?;
    let listing_id = parse_listing_id(query.listing_id.as_deref())?;

    FavoriteService::remove(pool.get_ref(), &user, listing_id).await?;
    Ok(message(StatusCode::OK, "Removed from favorites"))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/marketplace")
            .route("/listings", web::get().to(list_listings))
            .route("/listings/{id}", web::get().to(get_listing))
            .route("/favorites", web::get().to(list_favorites))
            .route("/favorites", web::post().to(add_favorite))
            .route("/favorites", web::delete().to(remove_favorite)),
    );
}
