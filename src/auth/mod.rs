// src/auth/mod.rs
// DOCUMENTATION: Authentication and authorization
// PURPOSE: Re-export RBAC table and session helpers

pub mod rbac;
pub mod session;

pub use rbac::{can_access, Permission, ResourceAction, ResourceScope, ResourceType, UserRole};
pub use session::{current_user, require_user, AuthenticatedUser};
