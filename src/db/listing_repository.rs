// src/db/listing_repository.rs
// DOCUMENTATION: Database access layer for the caregiver marketplace
// PURPOSE: Listing search and caregiver favorites

use crate::errors::ApiError;
use crate::models::*;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

const LISTING_COLUMNS: &str = r#"
    l.id, l.title, l.description, l.city, l.state, l.status,
    l.hourly_rate_min, l.hourly_rate_max, l.created_at
"#;

pub struct ListingRepository;

impl ListingRepository {
    fn push_filters(
        qb: &mut QueryBuilder<'_, Postgres>,
        status: ListingStatus,
        query: &ListingQuery,
    ) {
        qb.push(" WHERE l.status = ").push_bind(status.as_str());
        if let Some(city) = query.city.as_deref().filter(|c| !c.trim().is_empty()) {
            qb.push(" AND lower(l.city) = lower(")
                .push_bind(city.trim().to_string())
                .push(")");
        }
        if let Some(state) = query.state.as_deref().filter(|s| !s.trim().is_empty()) {
            qb.push(" AND upper(l.state) = upper(")
                .push_bind(state.trim().to_string())
                .push(")");
        }
    }

    /// Listings matching the query, newest first, with the total count
    pub async fn list(
        pool: &PgPool,
        query: &ListingQuery,
        page: PageParams,
    ) -> Result<(Vec<Listing>, i64), ApiError> {
        let status = query.status.unwrap_or(ListingStatus::Active);

        let mut qb = QueryBuilder::new(format!(
            "SELECT {} FROM marketplace_listings l",
            LISTING_COLUMNS
        ));
        Self::push_filters(&mut qb, status, query);
        qb.push(" ORDER BY l.created_at DESC, l.id DESC LIMIT ")
            .push_bind(page.limit)
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows: Vec<ListingRow> = qb
            .build_query_as()
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to list marketplace listings: {}", e);
                ApiError::DatabaseError(e.to_string())
            })?;

        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM marketplace_listings l");
        Self::push_filters(&mut count_qb, status, query);
        let total: (i64,) = count_qb
            .build_query_as()
            .fetch_one(pool)
            .await
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        let listings = rows
            .into_iter()
            .map(ListingRow::into_listing)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((listings, total.0))
    }

    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Listing, ApiError> {
        let row: ListingRow = sqlx::query_as(&format!(
            "SELECT {} FROM marketplace_listings l WHERE l.id = $1",
            LISTING_COLUMNS
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Listing"))?;
        row.into_listing()
    }

    pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, ApiError> {
        let row: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM marketplace_listings WHERE id = $1)")
                .bind(id)
                .fetch_one(pool)
                .await
                .map_err(|e| ApiError::DatabaseError(e.to_string()))?;
        Ok(row.0)
    }
}

pub struct FavoriteRepository;

impl FavoriteRepository {
    /// Favorites of one caregiver, most recent first
    pub async fn list(pool: &PgPool, caregiver_id: Uuid) -> Result<Vec<Favorite>, ApiError> {
        let rows: Vec<FavoriteRow> = sqlx::query_as(&format!(
            r#"
            SELECT fl.created_at AS favorited_at, {}
            FROM favorite_listings fl
            JOIN marketplace_listings l ON l.id = fl.listing_id
            WHERE fl.caregiver_id = $1
            ORDER BY fl.created_at DESC
            "#,
            LISTING_COLUMNS
        ))
        .bind(caregiver_id)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to list favorites for caregiver {}: {}", caregiver_id, e);
            ApiError::DatabaseError(e.to_string())
        })?;

        rows.into_iter().map(FavoriteRow::into_favorite).collect()
    }

    /// Returns false when the listing was already a favorite
    pub async fn add(pool: &PgPool, caregiver_id: Uuid, listing_id: Uuid) -> Result<bool, ApiError> {
        let result = sqlx::query(
            r#"
            INSERT INTO favorite_listings (caregiver_id, listing_id, created_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (caregiver_id, listing_id) DO NOTHING
            "#,
        )
        .bind(caregiver_id)
        .bind(listing_id)
        .execute(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to add favorite: {}", e);
            ApiError::DatabaseError(e.to_string())
        })?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn remove(
        pool: &PgPool,
        caregiver_id: Uuid,
        listing_id: Uuid,
    ) -> Result<(), ApiError> {
        let result = sqlx::query(
            "DELETE FROM favorite_listings WHERE caregiver_id = $1 AND listing_id = $2",
        )
        .bind(caregiver_id)
        .bind(listing_id)
        .execute(pool)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(ApiError::not_found("Favorite"));
        }
        Ok(())
    }
}
