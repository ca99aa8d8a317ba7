// src/models/inquiry.rs
// DOCUMENTATION: Placement inquiry records and DTOs
// PURPOSE: Rows, validated request bodies and query parameters for /api/inquiries

use super::enums::{nullable, parse_column, ContactMethod, InquiryStatus, InquiryUrgency};
use super::pagination::Pagination;
use crate::errors::ApiError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Row shape returned by the inquiry queries
/// DOCUMENTATION: Joined with families/homes/operators so access checks
/// need no second query
#[derive(Debug, FromRow)]
pub struct InquiryRow {
    pub id: Uuid,
    pub family_id: Uuid,
    pub home_id: Uuid,
    pub home_name: String,
    pub status: String,
    pub urgency: String,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub care_recipient_name: String,
    pub care_recipient_age: Option<i32>,
    pub care_needs: Vec<String>,
    pub additional_info: Option<String>,
    pub preferred_contact_method: String,
    pub tour_date: Option<DateTime<Utc>>,
    pub internal_notes: Option<String>,
    pub assigned_to_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub family_user_id: Uuid,
    pub operator_user_id: Uuid,
}

impl InquiryRow {
    pub fn into_inquiry(self) -> Result<Inquiry, ApiError> {
        Ok(Inquiry {
            id: self.id,
            family_id: self.family_id,
            home_id: self.home_id,
            home_name: self.home_name,
            status: parse_column("status", &self.status)?,
            urgency: parse_column("urgency", &self.urgency)?,
            contact_name: self.contact_name,
            contact_email: self.contact_email,
            contact_phone: self.contact_phone,
            care_recipient_name: self.care_recipient_name,
            care_recipient_age: self.care_recipient_age,
            care_needs: self.care_needs,
            additional_info: self.additional_info,
            preferred_contact_method: parse_column(
                "preferred_contact_method",
                &self.preferred_contact_method,
            )?,
            tour_date: self.tour_date,
            internal_notes: self.internal_notes,
            assigned_to_id: self.assigned_to_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
            family_user_id: self.family_user_id,
            operator_user_id: self.operator_user_id,
        })
    }
}

/// Placement inquiry sent by a family to a home
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    pub id: Uuid,
    pub family_id: Uuid,
    pub home_id: Uuid,
    pub home_name: String,
    pub status: InquiryStatus,
    pub urgency: InquiryUrgency,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub care_recipient_name: String,
    pub care_recipient_age: Option<i32>,
    pub care_needs: Vec<String>,
    pub additional_info: Option<String>,
    pub preferred_contact_method: ContactMethod,
    pub tour_date: Option<DateTime<Utc>>,
    pub internal_notes: Option<String>,
    pub assigned_to_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// User owning the family record
    #[serde(skip)]
    pub family_user_id: Uuid,

    /// User owning the operator of the home
    #[serde(skip)]
    pub operator_user_id: Uuid,
}

/// Body of POST /api/inquiries
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInquiryRequest {
    pub home_id: Uuid,

    #[validate(length(min = 1, max = 200, message = "Contact name is required"))]
    pub contact_name: String,

    #[validate(email(message = "Invalid email address"))]
    pub contact_email: String,

    #[validate(length(max = 40))]
    pub contact_phone: Option<String>,

    #[validate(length(min = 1, max = 200, message = "Care recipient name is required"))]
    pub care_recipient_name: String,

    #[validate(range(min = 1, max = 130, message = "Age must be a positive number"))]
    pub care_recipient_age: Option<i32>,

    #[serde(default)]
    pub care_needs: Vec<String>,

    #[validate(length(max = 5000))]
    pub additional_info: Option<String>,

    pub urgency: Option<InquiryUrgency>,

    pub preferred_contact_method: Option<ContactMethod>,

    pub tour_date: Option<DateTime<Utc>>,
}

/// Body of PATCH /api/inquiries/{id}
/// DOCUMENTATION: Absent fields are left untouched; `assignedToId: null`
/// clears the assignment
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInquiryRequest {
    pub status: Option<InquiryStatus>,

    pub urgency: Option<InquiryUrgency>,

    #[serde(default, deserialize_with = "nullable")]
    pub assigned_to_id: Option<Option<Uuid>>,

    #[validate(length(max = 10000))]
    pub internal_notes: Option<String>,

    pub tour_date: Option<DateTime<Utc>>,

    #[validate(length(min = 1, max = 200))]
    pub contact_name: Option<String>,

    #[validate(email(message = "Invalid email address"))]
    pub contact_email: Option<String>,

    #[validate(length(max = 40))]
    pub contact_phone: Option<String>,

    #[validate(length(min = 1, max = 200))]
    pub care_recipient_name: Option<String>,

    #[validate(range(min = 1, max = 130, message = "Age must be a positive number"))]
    pub care_recipient_age: Option<i32>,

    pub care_needs: Option<Vec<String>>,

    #[validate(length(max = 5000))]
    pub additional_info: Option<String>,

    pub preferred_contact_method: Option<ContactMethod>,
}

impl UpdateInquiryRequest {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.urgency.is_none()
            && self.assigned_to_id.is_none()
            && self.internal_notes.is_none()
            && self.tour_date.is_none()
            && self.contact_name.is_none()
            && self.contact_email.is_none()
            && self.contact_phone.is_none()
            && self.care_recipient_name.is_none()
            && self.care_recipient_age.is_none()
            && self.care_needs.is_none()
            && self.additional_info.is_none()
            && self.preferred_contact_method.is_none()
    }
}

/// Query string of GET /api/inquiries
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryListQuery {
    pub status: Option<InquiryStatus>,
    pub home_id: Option<Uuid>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct InquiryListResponse {
    pub inquiries: Vec<Inquiry>,
    pub pagination: Pagination,
}
