// src/db/mod.rs
// DOCUMENTATION: Database module organization
// PURPOSE: Re-export database components

pub mod audit_repository;
pub mod caregiver_repository;
#[cfg(test)]
pub mod fixtures;
pub mod inquiry_repository;
pub mod lead_repository;
pub mod listing_repository;
pub mod profile_repository;
pub mod session_repository;

pub use audit_repository::*;
pub use caregiver_repository::*;
pub use inquiry_repository::*;
pub use lead_repository::*;
pub use listing_repository::*;
pub use profile_repository::*;
pub use session_repository::*;
