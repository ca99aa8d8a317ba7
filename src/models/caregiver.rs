// src/models/caregiver.rs
// DOCUMENTATION: Caregiver directory records and DTOs
// PURPOSE: Rows, list query and bulk status body for /api/caregivers

use super::enums::{parse_column, parse_list, EmploymentStatus, EmploymentType};
use super::pagination::clamp_limit;
use crate::errors::ApiError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, FromRow)]
pub struct CaregiverRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub years_experience: Option<i32>,
    pub hourly_rate: Option<f64>,
    pub employment_type: String,
    pub employment_status: String,
    pub specialties: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CaregiverRow {
    pub fn into_caregiver(self) -> Result<Caregiver, ApiError> {
        Ok(Caregiver {
            id: self.id,
            user_id: self.user_id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            bio: self.bio,
            years_experience: self.years_experience,
            hourly_rate: self.hourly_rate,
            employment_type: parse_column("employment_type", &self.employment_type)?,
            employment_status: parse_column("employment_status", &self.employment_status)?,
            specialties: self.specialties,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Caregiver {
    pub id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub years_experience: Option<i32>,
    pub hourly_rate: Option<f64>,
    pub employment_type: EmploymentType,
    pub employment_status: EmploymentStatus,
    pub specialties: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Query string of GET /api/caregivers
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaregiverListQuery {
    /// Case-insensitive match on first name, last name or email
    pub q: Option<String>,
    pub employment_status: Option<EmploymentStatus>,
    pub employment_type: Option<EmploymentType>,
    /// Comma separated; a caregiver matches when any specialty overlaps
    pub specialties: Option<String>,
    /// Id of the last caregiver of the previous page
    pub cursor: Option<Uuid>,
    pub limit: Option<i64>,
}

/// Validated caregiver list filter
#[derive(Debug, Clone, PartialEq)]
pub struct CaregiverFilter {
    pub search: Option<String>,
    pub employment_status: Option<EmploymentStatus>,
    pub employment_type: Option<EmploymentType>,
    pub specialties: Vec<String>,
    pub cursor: Option<Uuid>,
    pub limit: i64,
    /// Restrict to caregivers employed by this operator
    pub operator_id: Option<Uuid>,
}

impl CaregiverListQuery {
    pub fn into_filter(self, operator_id: Option<Uuid>) -> CaregiverFilter {
        CaregiverFilter {
            search: self
                .q
                .map(|q| q.trim().to_string())
                .filter(|q| !q.is_empty()),
            employment_status: self.employment_status,
            employment_type: self.employment_type,
            specialties: parse_list(self.specialties.as_deref()),
            cursor: self.cursor,
            limit: clamp_limit(self.limit),
            operator_id,
        }
    }
}

/// Page of caregivers with the cursor for the next one
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaregiverPage {
    pub caregivers: Vec<Caregiver>,
    pub next_cursor: Option<Uuid>,
}

impl CaregiverPage {
    /// A full page means more rows may follow
    pub fn new(caregivers: Vec<Caregiver>, limit: i64) -> Self {
        let next_cursor = if caregivers.len() as i64 == limit {
            caregivers.last().map(|c| c.id)
        } else {
            None
        };
        Self {
            caregivers,
            next_cursor,
        }
    }
}

/// Body of POST /api/caregivers/bulk-status
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BulkStatusRequest {
    #[validate(length(min = 1, max = 100, message = "Provide between 1 and 100 caregiver ids"))]
    pub caregiver_ids: Vec<Uuid>,
    pub employment_status: EmploymentStatus,
}

/// Result of one item of a bulk status update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub previous: EmploymentStatus,
    pub current: EmploymentStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_normalization() {
        let query = CaregiverListQuery {
            q: Some("   ".into()),
            specialties: Some("dementia, hospice".into()),
            limit: Some(0),
            ..Default::default()
        };
        let filter = query.into_filter(None);
        assert_eq!(filter.search, None);
        assert_eq!(filter.specialties, vec!["dementia", "hospice"]);
        assert_eq!(filter.limit, 1);
    }

    #[test]
    fn test_bulk_request_bounds() {
        let empty: BulkStatusRequest = serde_json::from_value(json!({
            "caregiverIds": [],
            "employmentStatus": "INACTIVE"
        }))
        .unwrap();
        assert!(empty.validate().is_err());

        let ids: Vec<Uuid> = (0..=100).map(|_| Uuid::new_v4()).collect();
        let too_many = BulkStatusRequest {
            caregiver_ids: ids,
            employment_status: EmploymentStatus::Active,
        };
        assert!(too_many.validate().is_err());

        let ok = BulkStatusRequest {
            caregiver_ids: vec![Uuid::new_v4()],
            employment_status: EmploymentStatus::OnLeave,
        };
        assert!(ok.validate().is_ok());
    }
}
