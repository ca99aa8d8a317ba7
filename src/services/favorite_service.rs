// src/services/favorite_service.rs
// DOCUMENTATION: Business logic for marketplace listings and favorites
// PURPOSE: Resolve the caller's caregiver profile and manage saved listings

use crate::auth::{AuthenticatedUser, UserRole};
use crate::db::{FavoriteRepository, ListingRepository, ProfileRepository};
use crate::errors::ApiError;
use crate::models::{Favorite, Listing, ListingListResponse, ListingQuery, PageParams};
use sqlx::PgPool;
use uuid::Uuid;

pub struct MarketplaceService;

impl MarketplaceService {
    pub async fn list_listings(
        pool: &PgPool,
        query: ListingQuery,
    ) -> Result<ListingListResponse, ApiError> {
        let page = PageParams::new(query.page, query.limit);
        let (listings, total) = ListingRepository::list(pool, &query, page).await?;
        Ok(ListingListResponse {
            listings,
            pagination: page.paginate(total),
        })
    }

    pub async fn get_listing(pool: &PgPool, id: Uuid) -> Result<Listing, ApiError> {
        ListingRepository::get_by_id(pool, id).await
    }
}

pub struct FavoriteService;

impl FavoriteService {
    /// Caregiver profile of the caller, if they are a caregiver with one
    async fn caregiver_id(
        pool: &PgPool,
        user: &AuthenticatedUser,
    ) -> Result<Option<Uuid>, ApiError> {
        if user.role != UserRole::Caregiver {
            return Ok(None);
        }
        ProfileRepository::caregiver_id(pool, user.id).await
    }

    async fn require_caregiver(pool: &PgPool, user: &AuthenticatedUser) -> Result<Uuid, ApiError> {
        Self::caregiver_id(pool, user)
            .await?
            .ok_or_else(|| ApiError::forbidden("only caregivers can manage favorites"))
    }

    /// Non-caregivers simply have no favorites
    pub async fn list(pool: &PgPool, user: &AuthenticatedUser) -> Result<Vec<Favorite>, ApiError> {
        match Self::caregiver_id(pool, user).await? {
            Some(caregiver_id) => FavoriteRepository::list(pool, caregiver_id).await,
            None => Ok(Vec::new()),
        }
    }

    /// Idempotent; Ok(true) only when a new favorite was stored
    pub async fn add(
        pool: &PgPool,
        user: &AuthenticatedUser,
        listing_id: Uuid,
    ) -> Result<bool, ApiError> {
        let caregiver_id = Self::require_caregiver(pool, user).await?;
        if !ListingRepository::exists(pool, listing_id).await? {
            return Err(ApiError::not_found("Listing"));
        }

        let created = FavoriteRepository::add(pool, caregiver_id, listing_id).await?;
        if created {
            log::info!("Caregiver {} favorited listing {}", caregiver_id, listing_id);
        }
        Ok(created)
    }

    pub async fn remove(
        pool: &PgPool,
        user: &AuthenticatedUser,
        listing_id: Uuid,
    ) -> Result<(), ApiError> {
        let caregiver_id = Self::require_caregiver(pool, user).await?;
        FavoriteRepository::remove(pool, caregiver_id, listing_id).await?;
        log::info!("Caregiver {} removed favorite {}", caregiver_id, listing_id);
        Ok(())
    }
}
