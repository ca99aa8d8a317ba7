// src/models/listing.rs
// DOCUMENTATION: Marketplace listings and caregiver favorites
// PURPOSE: Rows and DTOs for /api/marketplace

use super::enums::{parse_column, ListingStatus};
use super::pagination::Pagination;
use crate::errors::ApiError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, FromRow)]
pub struct ListingRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub status: String,
    pub hourly_rate_min: Option<f64>,
    pub hourly_rate_max: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl ListingRow {
    pub fn into_listing(self) -> Result<Listing, ApiError> {
        Ok(Listing {
            id: self.id,
            title: self.title,
            description: self.description,
            city: self.city,
            state: self.state,
            status: parse_column("status", &self.status)?,
            hourly_rate_min: self.hourly_rate_min,
            hourly_rate_max: self.hourly_rate_max,
            created_at: self.created_at,
        })
    }
}

/// Job posted on the caregiver marketplace
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub status: ListingStatus,
    pub hourly_rate_min: Option<f64>,
    pub hourly_rate_max: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Query string of GET /api/marketplace/listings
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingQuery {
    pub city: Option<String>,
    pub state: Option<String>,
    /// Defaults to ACTIVE
    pub status: Option<ListingStatus>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ListingListResponse {
    pub listings: Vec<Listing>,
    pub pagination: Pagination,
}

/// Favorite joined with its listing
#[derive(Debug, FromRow)]
pub struct FavoriteRow {
    pub favorited_at: DateTime<Utc>,
    #[sqlx(flatten)]
    pub listing: ListingRow,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub listing_id: Uuid,
    pub favorited_at: DateTime<Utc>,
    pub listing: Listing,
}

impl FavoriteRow {
    pub fn into_favorite(self) -> Result<Favorite, ApiError> {
        Ok(Favorite {
            listing_id: self.listing.id,
            favorited_at: self.favorited_at,
            listing: self.listing.into_listing()?,
        })
    }
}

/// Body of POST /api/marketplace/favorites
/// DOCUMENTATION: listingId stays a string so a missing or malformed id
/// produces this API's 400 envelope
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRequest {
    pub listing_id: Option<String>,
}

/// Query string of DELETE /api/marketplace/favorites
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteQuery {
    pub listing_id: Option<String>,
}

/// Parse the listingId parameter shared by favorite routes
pub fn parse_listing_id(raw: Option<&str>) -> Result<Uuid, ApiError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::InvalidInput("listingId is required".to_string()))?;
    Uuid::parse_str(raw)
        .map_err(|_| ApiError::InvalidInput("listingId must be a valid id".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_listing_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_listing_id(Some(&id.to_string())).unwrap(), id);
        assert!(matches!(
            parse_listing_id(None),
            Err(ApiError::InvalidInput(msg)) if msg == "listingId is required"
        ));
        assert!(parse_listing_id(Some("  ")).is_err());
        assert!(parse_listing_id(Some("listing-1")).is_err());
    }
}
