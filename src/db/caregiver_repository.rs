// src/db/caregiver_repository.rs
// DOCUMENTATION: Database access layer for caregivers
// PURPOSE: Keyset-paginated directory and employment status changes

use crate::errors::ApiError;
use crate::models::*;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

/// Escape LIKE metacharacters and wrap for a contains match
fn contains_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

pub struct CaregiverRepository;

impl CaregiverRepository {
    /// Caregivers newest first, starting after `filter.cursor`
    pub async fn list(pool: &PgPool, filter: &CaregiverFilter) -> Result<Vec<Caregiver>, ApiError> {
        let mut qb = QueryBuilder::new(
            r#"
            SELECT
                c.id, c.user_id, u.first_name, u.last_name, u.email, u.phone,
                c.bio, c.years_experience, c.hourly_rate,
                c.employment_type, c.employment_status, c.specialties,
                c.created_at, c.updated_at
            FROM caregivers c
            JOIN users u ON u.id = c.user_id
            WHERE 1 = 1
            "#,
        );

        if let Some(operator_id) = filter.operator_id {
            qb.push(
                " AND EXISTS (SELECT 1 FROM caregiver_employments e WHERE e.caregiver_id = c.id AND e.operator_id = ",
            )
            .push_bind(operator_id)
            .push(")");
        }
        if let Some(search) = &filter.search {
            let pattern = contains_pattern(search);
            qb.push(" AND (u.first_name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR u.last_name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR u.email ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(status) = filter.employment_status {
            qb.push(" AND c.employment_status = ")
                .push_bind(status.as_str());
        }
        if let Some(kind) = filter.employment_type {
            qb.push(" AND c.employment_type = ").push_bind(kind.as_str());
        }
        if !filter.specialties.is_empty() {
            qb.push(" AND c.specialties && ")
                .push_bind(filter.specialties.clone());
        }
        if let Some(cursor) = filter.cursor {
            qb.push(" AND (c.created_at, c.id) < (SELECT created_at, id FROM caregivers WHERE id = ")
                .push_bind(cursor)
                .push(")");
        }
        qb.push(" ORDER BY c.created_at DESC, c.id DESC LIMIT ")
            .push_bind(filter.limit);

        let rows: Vec<CaregiverRow> = qb
            .build_query_as()
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to list caregivers: {}", e);
                ApiError::DatabaseError(e.to_string())
            })?;

        rows.into_iter().map(CaregiverRow::into_caregiver).collect()
    }

    /// Set one caregiver's employment status
    /// DOCUMENTATION: With `operator_id`, the caregiver must be employed by
    /// that operator
    pub async fn set_employment_status(
        pool: &PgPool,
        caregiver_id: Uuid,
        status: EmploymentStatus,
        operator_id: Option<Uuid>,
    ) -> Result<StatusChange, ApiError> {
        let current: Option<(String, bool)> = sqlx::query_as(
            r#"
            SELECT
                c.employment_status,
                EXISTS (
                    SELECT 1 FROM caregiver_employments e
                    WHERE e.caregiver_id = c.id AND e.operator_id = $2
                ) AS employed
            FROM caregivers c
            WHERE c.id = $1
            "#,
        )
        .bind(caregiver_id)
        .bind(operator_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        let (previous, employed) = current.ok_or_else(|| ApiError::not_found("Caregiver"))?;
        if operator_id.is_some() && !employed {
            return Err(ApiError::forbidden(
                "caregiver is not employed by your organization",
            ));
        }

        sqlx::query(
            "UPDATE caregivers SET employment_status = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(caregiver_id)
        .bind(status.as_str())
        .execute(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to update caregiver {}: {}", caregiver_id, e);
            ApiError::DatabaseError(e.to_string())
        })?;

        Ok(StatusChange {
            previous: parse_column("employment_status", &previous)?,
            current: status,
        })
    }
}
