// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod account;
pub mod caregiver;
pub mod enums;
pub mod inquiry;
pub mod lead;
pub mod listing;
pub mod pagination;

pub use account::*;
pub use caregiver::*;
pub use enums::*;
pub use inquiry::*;
pub use lead::*;
pub use listing::*;
pub use pagination::*;
