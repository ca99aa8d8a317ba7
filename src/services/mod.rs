// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod batch;
pub mod caregiver_service;
pub mod favorite_service;
pub mod inquiry_service;
pub mod lead_service;
pub mod password_reset_service;
pub mod rate_limiter;

pub use batch::*;
pub use caregiver_service::*;
pub use favorite_service::*;
pub use inquiry_service::*;
pub use lead_service::*;
pub use password_reset_service::*;
pub use rate_limiter::*;
