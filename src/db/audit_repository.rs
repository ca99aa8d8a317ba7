// src/db/audit_repository.rs
// DOCUMENTATION: Audit trail writes
// PURPOSE: Record who read or changed sensitive records

use crate::errors::ApiError;
use crate::models::AuditAction;
use sqlx::PgPool;
use uuid::Uuid;

/// One audit trail entry
#[derive(Debug, Clone)]
pub struct AuditEntry<'a> {
    pub action: AuditAction,
    pub resource_type: &'a str,
    pub resource_id: Uuid,
    pub description: String,
    pub ip_address: &'a str,
    pub user_id: Uuid,
}

pub struct AuditRepository;

impl AuditRepository {
    pub async fn record(pool: &PgPool, entry: AuditEntry<'_>) -> Result<(), ApiError> {
        sqlx::query(
            r#"
            INSERT INTO audit_logs (action, resource_type, resource_id, description, ip_address, user_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            "#,
        )
        .bind(entry.action.as_str())
        .bind(entry.resource_type)
        .bind(entry.resource_id)
        .bind(&entry.description)
        .bind(entry.ip_address)
        .bind(entry.user_id)
        .execute(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to write audit entry: {}", e);
            ApiError::DatabaseError(e.to_string())
        })?;
        Ok(())
    }
}
