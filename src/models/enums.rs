// src/models/enums.rs
// DOCUMENTATION: Enumerations stored as TEXT columns
// PURPOSE: One definition per enum for JSON names, database values and parsing

use crate::errors::ApiError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declares an enum whose JSON and database representation is the same
/// SCREAMING_SNAKE_CASE string
macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(format!("unknown {} value: {}", stringify!($name), other)),
                }
            }
        }
    };
}

text_enum! {
    /// Pipeline stage of a placement inquiry
    InquiryStatus {
        New => "NEW",
        Contacted => "CONTACTED",
        TourScheduled => "TOUR_SCHEDULED",
        TourCompleted => "TOUR_COMPLETED",
        Qualified => "QUALIFIED",
        Converting => "CONVERTING",
        Converted => "CONVERTED",
        PlacementOffered => "PLACEMENT_OFFERED",
        PlacementAccepted => "PLACEMENT_ACCEPTED",
        ClosedLost => "CLOSED_LOST",
    }
}

text_enum! {
    InquiryUrgency {
        Low => "LOW",
        Medium => "MEDIUM",
        High => "HIGH",
        Urgent => "URGENT",
    }
}

text_enum! {
    ContactMethod {
        Email => "EMAIL",
        Phone => "PHONE",
        Sms => "SMS",
        Any => "ANY",
    }
}

text_enum! {
    /// Triage state of a staffing lead
    LeadStatus {
        New => "NEW",
        InReview => "IN_REVIEW",
        Contacted => "CONTACTED",
        Closed => "CLOSED",
        Cancelled => "CANCELLED",
    }
}

text_enum! {
    /// Whether a lead targets an individual aide or a provider business
    LeadTargetType {
        Aide => "AIDE",
        Provider => "PROVIDER",
    }
}

text_enum! {
    EmploymentStatus {
        Active => "ACTIVE",
        Inactive => "INACTIVE",
        OnLeave => "ON_LEAVE",
        Terminated => "TERMINATED",
    }
}

text_enum! {
    EmploymentType {
        FullTime => "FULL_TIME",
        PartTime => "PART_TIME",
        PerDiem => "PER_DIEM",
        Contract => "CONTRACT",
    }
}

text_enum! {
    ListingStatus {
        Active => "ACTIVE",
        Paused => "PAUSED",
        Closed => "CLOSED",
    }
}

text_enum! {
    AuditAction {
        Create => "CREATE",
        Read => "READ",
        Update => "UPDATE",
        Delete => "DELETE",
    }
}

/// Parse a TEXT column into its enum
/// An unknown value means the row violates the schema, reported as a database error
pub fn parse_column<T>(column: &str, value: &str) -> Result<T, ApiError>
where
    T: FromStr<Err = String>,
{
    value.parse().map_err(|e: String| {
        log::error!("Invalid value in column {}: {}", column, e);
        ApiError::DatabaseError(e)
    })
}

/// Parse a comma separated query value, ignoring unknown entries
pub fn parse_list<T: FromStr>(raw: Option<&str>) -> Vec<T> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .filter_map(|v| v.parse().ok())
            .collect()
    })
    .unwrap_or_default()
}

/// Distinguishes an absent field (None) from an explicit null (Some(None))
/// DOCUMENTATION: Use with #[serde(default, deserialize_with = "nullable")]
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_enum_names() {
        assert_eq!(InquiryStatus::TourScheduled.as_str(), "TOUR_SCHEDULED");
        assert_eq!("IN_REVIEW".parse(), Ok(LeadStatus::InReview));
        assert!("in_review".parse::<LeadStatus>().is_err());
        assert_eq!(
            serde_json::to_string(&EmploymentStatus::OnLeave).unwrap(),
            "\"ON_LEAVE\""
        );
        for status in InquiryStatus::ALL {
            assert_eq!(status.as_str().parse::<InquiryStatus>(), Ok(*status));
        }
    }

    #[test]
    fn test_parse_list_skips_unknown_values() {
        let statuses: Vec<LeadStatus> = parse_list(Some("NEW, CLOSED,BOGUS,,"));
        assert_eq!(statuses, vec![LeadStatus::New, LeadStatus::Closed]);
        assert!(parse_list::<LeadStatus>(None).is_empty());
    }

    #[test]
    fn test_parse_column_reports_database_error() {
        let err = parse_column::<ListingStatus>("status", "ARCHIVED").unwrap_err();
        assert!(matches!(err, ApiError::DatabaseError(_)));
    }

    #[test]
    fn test_nullable_distinguishes_absent_and_null() {
        #[derive(Deserialize)]
        struct Patch {
            #[serde(default, deserialize_with = "nullable")]
            note: Option<Option<String>>,
        }

        let absent: Patch = serde_json::from_str("{}").unwrap();
        let null: Patch = serde_json::from_str(r#"{"note": null}"#).unwrap();
        let set: Patch = serde_json::from_str(r#"{"note": "hi"}"#).unwrap();

        assert_eq!(absent.note, None);
        assert_eq!(null.note, Some(None));
        assert_eq!(set.note, Some(Some("hi".to_string())));
    }
}
