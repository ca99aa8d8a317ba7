// src/db/lead_repository.rs
// DOCUMENTATION: Database access layer for operator leads
// PURPOSE: Filtered listing, detail, partial update and soft delete

use crate::errors::ApiError;
use crate::models::*;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

const LEAD_SELECT: &str = r#"
    SELECT
        l.id, l.family_id, f.primary_contact_name AS family_contact_name,
        l.target_type, l.aide_id, l.provider_id, l.status, l.message,
        l.operator_notes, l.assigned_operator_id,
        NULLIF(TRIM(CONCAT(u.first_name, ' ', u.last_name)), '') AS assigned_operator_name,
        l.created_at, l.updated_at
    FROM leads l
    JOIN families f ON f.id = l.family_id
    LEFT JOIN users u ON u.id = l.assigned_operator_id
"#;

pub struct LeadRepository;

impl LeadRepository {
    fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &LeadFilter) {
        qb.push(" WHERE l.deleted_at IS NULL");

        if !filter.statuses.is_empty() {
            let statuses: Vec<String> = filter
                .statuses
                .iter()
                .map(|s| s.as_str().to_string())
                .collect();
            qb.push(" AND l.status = ANY(").push_bind(statuses).push(")");
        }
        if let Some(target_type) = filter.target_type {
            qb.push(" AND l.target_type = ")
                .push_bind(target_type.as_str());
        }
        match filter.assignee {
            None => {}
            Some(AssigneeFilter::Unassigned) => {
                qb.push(" AND l.assigned_operator_id IS NULL");
            }
            Some(AssigneeFilter::User(user_id)) => {
                qb.push(" AND l.assigned_operator_id = ").push_bind(user_id);
            }
        }
    }

    pub async fn list(pool: &PgPool, filter: &LeadFilter) -> Result<(Vec<Lead>, i64), ApiError> {
        let mut qb = QueryBuilder::new(LEAD_SELECT);
        Self::push_filters(&mut qb, filter);
        // Sort column comes from a whitelist, never from the request text
        qb.push(" ORDER BY ")
            .push(filter.sort_by.column())
            .push(if filter.descending { " DESC" } else { " ASC" })
            .push(", l.id DESC LIMIT ")
            .push_bind(filter.page.limit)
            .push(" OFFSET ")
            .push_bind(filter.page.offset());

        let rows: Vec<LeadRow> = qb
            .build_query_as()
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to list leads: {}", e);
                ApiError::DatabaseError(e.to_string())
            })?;

        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM leads l");
        Self::push_filters(&mut count_qb, filter);
        let total: (i64,) = count_qb
            .build_query_as()
            .fetch_one(pool)
            .await
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        let leads = rows
            .into_iter()
            .map(LeadRow::into_lead)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((leads, total.0))
    }

    /// Lead by id, excluding soft-deleted ones
    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Lead, ApiError> {
        let row: LeadRow = sqlx::query_as(&format!(
            "{} WHERE l.id = $1 AND l.deleted_at IS NULL",
            LEAD_SELECT
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Lead"))?;
        row.into_lead()
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        req: &UpdateLeadRequest,
    ) -> Result<Lead, ApiError> {
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new("UPDATE leads SET ");
        {
            let mut set = qb.separated(", ");
            if let Some(status) = req.status {
                set.push("status = ").push_bind_unseparated(status.as_str());
            }
            if let Some(notes) = &req.operator_notes {
                set.push("operator_notes = ")
                    .push_bind_unseparated(notes.clone());
            }
            if let Some(assignee) = req.assigned_operator_id {
                set.push("assigned_operator_id = ")
                    .push_bind_unseparated(assignee);
            }
            set.push("updated_at = NOW()");
        }
        qb.push(" WHERE id = ")
            .push_bind(id)
            .push(" AND deleted_at IS NULL");

        let result = qb.build().execute(pool).await.map_err(|e| {
            log::error!("Failed to update lead {}: {}", id, e);
            ApiError::DatabaseError(e.to_string())
        })?;
        if result.rows_affected() == 0 {
            return Err(ApiError::not_found("Lead"));
        }

        Self::get_by_id(pool, id).await
    }

    pub async fn soft_delete(pool: &PgPool, id: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query(
            "UPDATE leads SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;
        if result.rows_affected() == 0 {
            return Err(ApiError::not_found("Lead"));
        }
        Ok(())
    }
}
