// src/db/session_repository.rs
// DOCUMENTATION: Database access for sessions and user accounts
// PURPOSE: Session lookup, user lookup, password reset tokens

use crate::auth::AuthenticatedUser;
use crate::errors::ApiError;
use crate::models::{parse_column, SessionUserRow, UserSummary};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

pub struct SessionRepository;

impl SessionRepository {
    /// User owning an unexpired session token
    pub async fn find_user_by_token(
        pool: &PgPool,
        token: &str,
    ) -> Result<Option<AuthenticatedUser>, ApiError> {
        let row: Option<SessionUserRow> = sqlx::query_as(
            r#"
            SELECT u.id, u.email, u.first_name, u.last_name, u.role
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token = $1 AND s.expires_at > NOW()
            "#,
        )
        .bind(token)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to look up session: {}", e);
            ApiError::DatabaseError(e.to_string())
        })?;

        row.map(|r| {
            Ok(AuthenticatedUser {
                id: r.id,
                role: parse_column("role", &r.role)?,
                email: r.email,
                first_name: r.first_name,
                last_name: r.last_name,
            })
        })
        .transpose()
    }
}

pub struct AccountRepository;

impl AccountRepository {
    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<UserSummary>, ApiError> {
        sqlx::query_as(
            "SELECT id, email, first_name, role FROM users WHERE lower(email) = $1",
        )
        .bind(email)
        .fetch_optional(pool)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<UserSummary>, ApiError> {
        sqlx::query_as("SELECT id, email, first_name, role FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| ApiError::DatabaseError(e.to_string()))
    }

    /// Replace any outstanding reset token for the user with a new one
    pub async fn store_reset_token(
        pool: &PgPool,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), ApiError> {
        let mut tx = pool
            .begin()
            .await
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        sqlx::query("DELETE FROM password_reset_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO password_reset_tokens (token, user_id, expires_at, created_at)
            VALUES ($1, $2, $3, NOW())
            "#,
        )
        .bind(token)
        .bind(user_id)
        .bind(expires_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            log::error!("Failed to store password reset token: {}", e);
            ApiError::DatabaseError(e.to_string())
        })?;

        tx.commit()
            .await
            .map_err(|e| ApiError::DatabaseError(e.to_string()))
    }
}
