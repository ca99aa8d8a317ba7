// src/services/caregiver_service.rs
// DOCUMENTATION: Business logic for the caregiver directory
// PURPOSE: Operator scoping, keyset listing and bulk status changes

use crate::auth::{AuthenticatedUser, ResourceAction, ResourceType, UserRole};
use crate::db::{CaregiverRepository, ProfileRepository};
use crate::errors::ApiError;
use crate::models::{BulkStatusRequest, CaregiverListQuery, CaregiverPage, StatusChange};
use crate::services::BatchResult;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Per-item failure text; driver messages stay in the logs
fn failure_reason(error: &ApiError) -> String {
    match error {
        ApiError::DatabaseError(_) | ApiError::Internal(_) => "database error".to_string(),
        other => other.to_string(),
    }
}

pub struct CaregiverService;

impl CaregiverService {
    /// Operator record the caller is confined to; None for unscoped roles
    async fn operator_scope(
        pool: &PgPool,
        user: &AuthenticatedUser,
    ) -> Result<Option<Uuid>, ApiError> {
        if user.role != UserRole::Operator {
            return Ok(None);
        }
        ProfileRepository::operator_id(pool, user.id)
            .await?
            .map(Some)
            .ok_or_else(|| ApiError::forbidden("an operator profile is required"))
    }

    pub async fn list(
        pool: &PgPool,
        user: &AuthenticatedUser,
        query: CaregiverListQuery,
    ) -> Result<CaregiverPage, ApiError> {
        user.require_action(ResourceType::Caregiver, ResourceAction::View)?;
        let operator_id = Self::operator_scope(pool, user).await?;
        let filter = query.into_filter(operator_id);

        let caregivers = CaregiverRepository::list(pool, &filter).await?;
        Ok(CaregiverPage::new(caregivers, filter.limit))
    }

    /// Apply one employment status to many caregivers, one at a time
    pub async fn bulk_update_status(
        pool: &PgPool,
        user: &AuthenticatedUser,
        req: BulkStatusRequest,
    ) -> Result<BatchResult<Uuid, StatusChange>, ApiError> {
        user.require_action(ResourceType::Caregiver, ResourceAction::Update)?;
        req.validate()?;
        let operator_id = Self::operator_scope(pool, user).await?;

        let mut batch = BatchResult::new();
        for caregiver_id in req.caregiver_ids {
            let result = CaregiverRepository::set_employment_status(
                pool,
                caregiver_id,
                req.employment_status,
                operator_id,
            )
            .await
            .map_err(|e| {
                log::warn!("Status change for caregiver {} failed: {}", caregiver_id, e);
                failure_reason(&e)
            });
            batch.record(caregiver_id, result);
        }

        log::info!(
            "User {} set {} caregivers to {} ({} failed)",
            user.id,
            batch.succeeded(),
            req.employment_status,
            batch.failed()
        );
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures;
    use crate::models::EmploymentStatus;

    #[test]
    fn test_failure_reason_hides_driver_errors() {
        assert_eq!(
            failure_reason(&ApiError::DatabaseError("relation does not exist".into())),
            "database error"
        );
        assert_eq!(
            failure_reason(&ApiError::not_found("Caregiver")),
            "Caregiver not found"
        );
        assert!(failure_reason(&ApiError::forbidden("not employed")).contains("not employed"));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
    async fn test_bulk_status_reports_each_item(pool: PgPool) {
        let operator = fixtures::user(&pool, UserRole::Operator).await;
        let operator_id = fixtures::operator(&pool, operator.id).await;

        let staff = fixtures::user(&pool, UserRole::Caregiver).await;
        let employed = fixtures::caregiver(&pool, staff.id, 0.0).await;
        fixtures::employ(&pool, employed, operator_id).await;

        let outsider = fixtures::user(&pool, UserRole::Caregiver).await;
        let not_employed = fixtures::caregiver(&pool, outsider.id, 0.0).await;
        let missing = Uuid::new_v4();

        let req = BulkStatusRequest {
            caregiver_ids: vec![employed, missing, not_employed],
            employment_status: EmploymentStatus::OnLeave,
        };
        let batch = CaregiverService::bulk_update_status(&pool, &operator, req)
            .await
            .unwrap();

        assert_eq!(batch.total(), 3);
        assert_eq!(batch.succeeded(), 1);
        let failures: Vec<_> = batch.failures().collect();
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0], (&missing, "Caregiver not found"));
        assert_eq!(failures[1].0, &not_employed);
        assert!(failures[1].1.contains("not employed by your organization"));

        let status: (String,) =
            sqlx::query_as("SELECT employment_status FROM caregivers WHERE id = $1")
                .bind(not_employed)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(status.0, "ACTIVE");
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
    async fn test_keyset_pages_do_not_overlap(pool: PgPool) {
        let admin = fixtures::user(&pool, UserRole::Admin).await;
        let mut expected = Vec::new();
        for age in 0..5 {
            let user = fixtures::user(&pool, UserRole::Caregiver).await;
            expected.push(fixtures::caregiver(&pool, user.id, f64::from(age) * 60.0).await);
        }

        let mut seen = Vec::new();
        let mut cursor = None;
        loop {
            let query = CaregiverListQuery {
                cursor,
                limit: Some(2),
                ..Default::default()
            };
            let page = CaregiverService::list(&pool, &admin, query).await.unwrap();
            assert!(page.caregivers.len() <= 2);
            seen.extend(page.caregivers.iter().map(|c| c.id));
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        // Newest first, every caregiver exactly once
        assert_eq!(seen, expected);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
    async fn test_operator_without_profile_is_forbidden(pool: PgPool) {
        let operator = fixtures::user(&pool, UserRole::Operator).await;
        let err = CaregiverService::list(&pool, &operator, CaregiverListQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }
}
