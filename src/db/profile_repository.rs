// src/db/profile_repository.rs
// DOCUMENTATION: Lookups from a user to their role-specific profile
// PURPOSE: Resolve family/operator/caregiver records owned by the session user

use crate::errors::ApiError;
use sqlx::PgPool;
use uuid::Uuid;

pub struct ProfileRepository;

impl ProfileRepository {
    async fn id_for_user(
        pool: &PgPool,
        sql: &'static str,
        user_id: Uuid,
    ) -> Result<Option<Uuid>, ApiError> {
        let row: Option<(Uuid,)> = sqlx::query_as(sql)
            .bind(user_id)
            .fetch_optional(pool)
            .await
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;
        Ok(row.map(|r| r.0))
    }

    pub async fn family_id(pool: &PgPool, user_id: Uuid) -> Result<Option<Uuid>, ApiError> {
        Self::id_for_user(pool, "SELECT id FROM families WHERE user_id = $1", user_id).await
    }

    pub async fn operator_id(pool: &PgPool, user_id: Uuid) -> Result<Option<Uuid>, ApiError> {
        Self::id_for_user(pool, "SELECT id FROM operators WHERE user_id = $1", user_id).await
    }

    pub async fn caregiver_id(pool: &PgPool, user_id: Uuid) -> Result<Option<Uuid>, ApiError> {
        Self::id_for_user(pool, "SELECT id FROM caregivers WHERE user_id = $1", user_id).await
    }

    pub async fn home_exists(pool: &PgPool, home_id: Uuid) -> Result<bool, ApiError> {
        let row: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM homes WHERE id = $1)")
            .bind(home_id)
            .fetch_one(pool)
            .await
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;
        Ok(row.0)
    }
}
