// src/services/lead_service.rs
// DOCUMENTATION: Business logic for operator lead triage
// PURPOSE: Role gate, assignee validation and audit trail around leads

use crate::auth::{AuthenticatedUser, UserRole};
use crate::db::{AccountRepository, AuditEntry, AuditRepository, LeadRepository};
use crate::errors::ApiError;
use crate::models::{AuditAction, Lead, LeadListQuery, LeadListResponse, UpdateLeadRequest};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

const TRIAGE_ROLES: &[UserRole] = &[UserRole::Operator, UserRole::Admin];
const AUDIT_RESOURCE: &str = "LEAD";

/// Only operators and admins can own a lead
fn can_be_assigned(role: UserRole) -> bool {
    TRIAGE_ROLES.contains(&role)
}

pub struct LeadService;

impl LeadService {
    /// Audit failures are logged but never fail the request
    async fn audit(
        pool: &PgPool,
        user: &AuthenticatedUser,
        ip_address: &str,
        action: AuditAction,
        lead_id: Uuid,
        description: String,
    ) {
        let entry = AuditEntry {
            action,
            resource_type: AUDIT_RESOURCE,
            resource_id: lead_id,
            description,
            ip_address,
            user_id: user.id,
        };
        if let Err(e) = AuditRepository::record(pool, entry).await {
            log::warn!("Audit entry for lead {} was not written: {}", lead_id, e);
        }
    }

    pub async fn list(
        pool: &PgPool,
        user: &AuthenticatedUser,
        query: LeadListQuery,
    ) -> Result<LeadListResponse, ApiError> {
        user.require_any_role(TRIAGE_ROLES)?;
        let filter = query.into_filter(user.id)?;

        let (leads, total) = LeadRepository::list(pool, &filter).await?;
        Ok(LeadListResponse {
            leads,
            pagination: filter.page.paginate(total),
        })
    }

    pub async fn get(
        pool: &PgPool,
        user: &AuthenticatedUser,
        id: Uuid,
        ip_address: &str,
    ) -> Result<Lead, ApiError> {
        user.require_any_role(TRIAGE_ROLES)?;
        let lead = LeadRepository::get_by_id(pool, id).await?;

        Self::audit(
            pool,
            user,
            ip_address,
            AuditAction::Read,
            id,
            "Viewed lead details".to_string(),
        )
        .await;
        Ok(lead)
    }

    pub async fn update(
        pool: &PgPool,
        user: &AuthenticatedUser,
        id: Uuid,
        req: UpdateLeadRequest,
        ip_address: &str,
    ) -> Result<Lead, ApiError> {
        user.require_any_role(TRIAGE_ROLES)?;
        req.validate()?;

        let fields = req.changed_fields();
        if fields.is_empty() {
            return Err(ApiError::InvalidInput("No fields to update".to_string()));
        }

        if let Some(Some(assignee_id)) = req.assigned_operator_id {
            let assignee = AccountRepository::find_by_id(pool, assignee_id).await?;
            let assignable = assignee
                .and_then(|a| a.role.parse::<UserRole>().ok())
                .map(can_be_assigned)
                .unwrap_or(false);
            if !assignable {
                return Err(ApiError::InvalidInput(
                    "assignedOperatorId must reference an operator or admin user".to_string(),
                ));
            }
        }

        let lead = LeadRepository::update(pool, id, &req).await?;
        log::info!("User {} updated lead {} ({})", user.id, id, fields.join(", "));

        Self::audit(
            pool,
            user,
            ip_address,
            AuditAction::Update,
            id,
            format!("Updated lead fields: {}", fields.join(", ")),
        )
        .await;
        Ok(lead)
    }

    /// Soft delete; the row stays for reporting
    pub async fn delete(
        pool: &PgPool,
        user: &AuthenticatedUser,
        id: Uuid,
        ip_address: &str,
    ) -> Result<(), ApiError> {
        user.require_any_role(TRIAGE_ROLES)?;
        LeadRepository::soft_delete(pool, id).await?;
        log::info!("User {} deleted lead {}", user.id, id);

        Self::audit(
            pool,
            user,
            ip_address,
            AuditAction::Delete,
            id,
            "Deleted lead".to_string(),
        )
        .await;
        Ok(())
    }
}
