// src/services/inquiry_service.rs
// DOCUMENTATION: Business logic for placement inquiries
// PURPOSE: Role scoping and ownership checks around the inquiry repository

use crate::auth::{
    can_access, AuthenticatedUser, Permission, ResourceAction, ResourceScope, ResourceType,
    UserRole,
};
use crate::db::{InquiryRepository, InquiryScope, ProfileRepository};
use crate::errors::ApiError;
use crate::models::{
    CreateInquiryRequest, Inquiry, InquiryListQuery, InquiryListResponse, PageParams,
    UpdateInquiryRequest,
};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Which inquiries a role may list
fn list_scope(user: &AuthenticatedUser) -> Result<InquiryScope, ApiError> {
    match user.role {
        UserRole::Admin => Ok(InquiryScope::All),
        UserRole::Family => Ok(InquiryScope::FamilyUser(user.id)),
        UserRole::Operator => Ok(InquiryScope::OperatorUser(user.id)),
        _ => Err(ApiError::forbidden("role cannot list inquiries")),
    }
}

fn ownership(inquiry: &Inquiry) -> ResourceScope {
    ResourceScope {
        operator_id: Some(inquiry.operator_user_id),
        family_id: Some(inquiry.family_user_id),
        ..Default::default()
    }
}

fn ensure_access(
    user: &AuthenticatedUser,
    permission: Permission,
    inquiry: &Inquiry,
) -> Result<(), ApiError> {
    if can_access(user.role, permission, Some(&ownership(inquiry)), Some(user.id)) {
        Ok(())
    } else {
        log::warn!(
            "User {} ({}) denied {} on inquiry {}",
            user.id,
            user.role,
            permission,
            inquiry.id
        );
        Err(ApiError::forbidden("you do not have access to this inquiry"))
    }
}

pub struct InquiryService;

impl InquiryService {
    pub async fn list(
        pool: &PgPool,
        user: &AuthenticatedUser,
        query: InquiryListQuery,
    ) -> Result<InquiryListResponse, ApiError> {
        user.require_action(ResourceType::Inquiry, ResourceAction::View)?;
        let scope = list_scope(user)?;
        let page = PageParams::new(query.page, query.limit);

        let (inquiries, total) = InquiryRepository::list(pool, scope, &query, page).await?;
        Ok(InquiryListResponse {
            inquiries,
            pagination: page.paginate(total),
        })
    }

    /// Create an inquiry on behalf of the caller's family
    pub async fn create(
        pool: &PgPool,
        user: &AuthenticatedUser,
        req: CreateInquiryRequest,
    ) -> Result<Inquiry, ApiError> {
        user.require_action(ResourceType::Inquiry, ResourceAction::Create)?;
        req.validate()?;

        let family_id = ProfileRepository::family_id(pool, user.id)
            .await?
            .ok_or_else(|| ApiError::forbidden("a family profile is required to send inquiries"))?;

        if !ProfileRepository::home_exists(pool, req.home_id).await? {
            return Err(ApiError::not_found("Home"));
        }

        InquiryRepository::create(pool, family_id, &req).await
    }

    pub async fn get(
        pool: &PgPool,
        user: &AuthenticatedUser,
        id: Uuid,
    ) -> Result<Inquiry, ApiError> {
        let inquiry = InquiryRepository::get_by_id(pool, id).await?;
        ensure_access(user, Permission::InquiriesView, &inquiry)?;
        Ok(inquiry)
    }

    pub async fn update(
        pool: &PgPool,
        user: &AuthenticatedUser,
        id: Uuid,
        req: UpdateInquiryRequest,
    ) -> Result<Inquiry, ApiError> {
        user.require_action(ResourceType::Inquiry, ResourceAction::Update)?;
        req.validate()?;
        if req.is_empty() {
            return Err(ApiError::InvalidInput("No fields to update".to_string()));
        }

        let existing = InquiryRepository::get_by_id(pool, id).await?;
        ensure_access(user, Permission::InquiriesUpdate, &existing)?;

        let updated = InquiryRepository::update(pool, id, &req).await?;
        log::info!("User {} updated inquiry {}", user.id, id);
        Ok(updated)
    }

    pub async fn delete(pool: &PgPool, user: &AuthenticatedUser, id: Uuid) -> Result<(), ApiError> {
        user.require_action(ResourceType::Inquiry, ResourceAction::Delete)?;
        InquiryRepository::delete(pool, id).await
    }
}
