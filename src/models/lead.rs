// src/models/lead.rs
// DOCUMENTATION: Staffing leads triaged by operators
// PURPOSE: Rows, list filters and update body for /api/operator/leads

use super::enums::{nullable, parse_column, parse_list, LeadStatus, LeadTargetType};
use super::pagination::{PageParams, Pagination};
use crate::errors::ApiError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::borrow::Cow;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

pub const MAX_OPERATOR_NOTES: usize = 5000;

#[derive(Debug, FromRow)]
pub struct LeadRow {
    pub id: Uuid,
    pub family_id: Uuid,
    pub family_contact_name: Option<String>,
    pub target_type: String,
    pub aide_id: Option<Uuid>,
    pub provider_id: Option<Uuid>,
    pub status: String,
    pub message: Option<String>,
    pub operator_notes: Option<String>,
    pub assigned_operator_id: Option<Uuid>,
    pub assigned_operator_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LeadRow {
    pub fn into_lead(self) -> Result<Lead, ApiError> {
        Ok(Lead {
            id: self.id,
            family_id: self.family_id,
            family_contact_name: self.family_contact_name,
            target_type: parse_column("target_type", &self.target_type)?,
            aide_id: self.aide_id,
            provider_id: self.provider_id,
            status: parse_column("status", &self.status)?,
            message: self.message,
            operator_notes: self.operator_notes,
            assigned_operator_id: self.assigned_operator_id,
            assigned_operator_name: self.assigned_operator_name,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Request from a family for an aide or provider
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: Uuid,
    pub family_id: Uuid,
    pub family_contact_name: Option<String>,
    pub target_type: LeadTargetType,
    pub aide_id: Option<Uuid>,
    pub provider_id: Option<Uuid>,
    pub status: LeadStatus,
    pub message: Option<String>,
    pub operator_notes: Option<String>,
    pub assigned_operator_id: Option<Uuid>,
    pub assigned_operator_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw query string of GET /api/operator/leads
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadListQuery {
    /// Comma separated statuses; unknown values are ignored
    pub status: Option<String>,
    pub target_type: Option<String>,
    /// `unassigned`, `me`, or a user id
    pub assigned_operator_id: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssigneeFilter {
    Unassigned,
    User(Uuid),
}

/// Whitelisted sort column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadSortField {
    CreatedAt,
    UpdatedAt,
    Status,
    TargetType,
}

impl LeadSortField {
    pub fn column(&self) -> &'static str {
        match self {
            LeadSortField::CreatedAt => "l.created_at",
            LeadSortField::UpdatedAt => "l.updated_at",
            LeadSortField::Status => "l.status",
            LeadSortField::TargetType => "l.target_type",
        }
    }

    fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("updatedAt") => LeadSortField::UpdatedAt,
            Some("status") => LeadSortField::Status,
            Some("targetType") => LeadSortField::TargetType,
            _ => LeadSortField::CreatedAt,
        }
    }
}

/// Validated lead list filter
#[derive(Debug, Clone, PartialEq)]
pub struct LeadFilter {
    pub statuses: Vec<LeadStatus>,
    pub target_type: Option<LeadTargetType>,
    pub assignee: Option<AssigneeFilter>,
    pub page: PageParams,
    pub sort_by: LeadSortField,
    pub descending: bool,
}

impl LeadListQuery {
    /// Resolve the raw query for the calling user
    /// DOCUMENTATION: `assignedOperatorId=me` resolves to `caller`
    pub fn into_filter(self, caller: Uuid) -> Result<LeadFilter, ApiError> {
        let assignee = match self.assigned_operator_id.as_deref().map(str::trim) {
            None | Some("") => None,
            Some("unassigned") => Some(AssigneeFilter::Unassigned),
            Some("me") => Some(AssigneeFilter::User(caller)),
            Some(id) => Some(AssigneeFilter::User(Uuid::parse_str(id).map_err(|_| {
                ApiError::InvalidInput(format!("assignedOperatorId is not a valid id: {}", id))
            })?)),
        };

        Ok(LeadFilter {
            statuses: parse_list(self.status.as_deref()),
            target_type: self
                .target_type
                .as_deref()
                .and_then(|t| t.parse::<LeadTargetType>().ok()),
            assignee,
            page: PageParams::new(self.page, self.limit),
            sort_by: LeadSortField::from_query(self.sort_by.as_deref()),
            descending: !matches!(self.sort_order.as_deref(), Some("asc")),
        })
    }
}

/// Body of PATCH /api/operator/leads/{id}
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLeadRequest {
    pub status: Option<LeadStatus>,

    #[serde(default, deserialize_with = "nullable")]
    pub operator_notes: Option<Option<String>>,

    #[serde(default, deserialize_with = "nullable")]
    pub assigned_operator_id: Option<Option<Uuid>>,
}

impl UpdateLeadRequest {
    /// Names of the fields present in the body, for the audit trail
    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.status.is_some() {
            fields.push("status");
        }
        if self.operator_notes.is_some() {
            fields.push("operatorNotes");
        }
        if self.assigned_operator_id.is_some() {
            fields.push("assignedOperatorId");
        }
        fields
    }
}

impl Validate for UpdateLeadRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(Some(notes)) = &self.operator_notes {
            if notes.chars().count() > MAX_OPERATOR_NOTES {
                let mut error = ValidationError::new("length");
                error.message = Some(Cow::from(
                    "Operator notes must not exceed 5000 characters",
                ));
                error.add_param(Cow::from("max"), &MAX_OPERATOR_NOTES);
                errors.add("operator_notes", error);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LeadListResponse {
    pub leads: Vec<Lead>,
    pub pagination: Pagination,
}
