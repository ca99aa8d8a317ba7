// src/auth/session.rs
// DOCUMENTATION: Session cookie authentication
// PURPOSE: Resolve the calling user and enforce role/permission requirements

use super::rbac::{
    can_perform_action, has_permission, permission_for_resource, Permission, ResourceAction,
    ResourceType, UserRole,
};
use crate::config::Config;
use crate::db::SessionRepository;
use crate::errors::ApiError;
use actix_web::HttpRequest;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

/// User attached to a valid, unexpired session
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn has_permission(&self, permission: Permission) -> bool {
        has_permission(self.role, permission)
    }

    /// 403 unless the user's role grants `permission`
    pub fn require_permission(&self, permission: Permission) -> Result<(), ApiError> {
        if self.has_permission(permission) {
            return Ok(());
        }
        log::warn!(
            "User {} ({}) lacks permission {}",
            self.id,
            self.role,
            permission
        );
        Err(ApiError::forbidden(format!("missing permission {}", permission)))
    }

    /// 403 unless the user's role may perform `action` on `resource`
    pub fn require_action(
        &self,
        resource: ResourceType,
        action: ResourceAction,
    ) -> Result<(), ApiError> {
        if can_perform_action(self.role, resource, action) {
            return Ok(());
        }
        match permission_for_resource(resource, action) {
            Some(permission) => self.require_permission(permission),
            None => {
                log::warn!(
                    "User {} attempted unmapped action {:?} on {:?}",
                    self.id,
                    action,
                    resource
                );
                Err(ApiError::forbidden(format!(
                    "{:?} is not allowed on {:?}",
                    action, resource
                )))
            }
        }
    }

    /// 403 unless the user holds one of `roles`
    pub fn require_any_role(&self, roles: &[UserRole]) -> Result<(), ApiError> {
        if roles.contains(&self.role) {
            return Ok(());
        }
        log::warn!("User {} with role {} denied", self.id, self.role);
        Err(ApiError::forbidden("insufficient role"))
    }
}

/// Session token carried by the request, if any
pub fn session_token(req: &HttpRequest, config: &Config) -> Option<String> {
    req.cookie(&config.session_cookie_name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// Look up the session user; None when no cookie or the session is unknown/expired
/// DOCUMENTATION: Only touches the database when a session cookie is present
pub async fn current_user(
    pool: &PgPool,
    config: &Config,
    req: &HttpRequest,
) -> Result<Option<AuthenticatedUser>, ApiError> {
    let token = match session_token(req, config) {
        Some(token) => token,
        None => return Ok(None),
    };

    let user = SessionRepository::find_user_by_token(pool, &token).await?;
    if user.is_none() {
        log::debug!("Session cookie present but no active session matched");
    }
    Ok(user)
}

/// 401 when the request carries no valid session
pub async fn require_user(
    pool: &PgPool,
    config: &Config,
    req: &HttpRequest,
) -> Result<AuthenticatedUser, ApiError> {
    current_user(pool, config, req)
        .await?
        .ok_or(ApiError::Unauthorized)
}
