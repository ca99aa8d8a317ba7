// src/auth/rbac.rs
// DOCUMENTATION: Role-based access control
// PURPOSE: Closed set of roles and permissions with a total role -> permission table

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Account role stored on every user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    Operator,
    Caregiver,
    Family,
    Staff,
    Affiliate,
    Provider,
}

impl UserRole {
    pub const ALL: [UserRole; 7] = [
        UserRole::Admin,
        UserRole::Operator,
        UserRole::Caregiver,
        UserRole::Family,
        UserRole::Staff,
        UserRole::Affiliate,
        UserRole::Provider,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::Operator => "OPERATOR",
            UserRole::Caregiver => "CAREGIVER",
            UserRole::Family => "FAMILY",
            UserRole::Staff => "STAFF",
            UserRole::Affiliate => "AFFILIATE",
            UserRole::Provider => "PROVIDER",
        }
    }

    /// Every permission granted to this role
    /// DOCUMENTATION: Exhaustive match - adding a role without a row here
    /// is a compile error
    pub fn permissions(&self) -> &'static [Permission] {
        use Permission::*;

        match self {
            UserRole::Admin => Permission::ALL,
            UserRole::Operator => &[
                ResidentsView,
                ResidentsCreate,
                ResidentsUpdate,
                ResidentsDelete,
                AssessmentsView,
                AssessmentsCreate,
                AssessmentsUpdate,
                AssessmentsDelete,
                IncidentsView,
                IncidentsCreate,
                IncidentsUpdate,
                IncidentsDelete,
                IncidentsResolve,
                ComplianceView,
                ComplianceCreate,
                ComplianceUpdate,
                ComplianceDelete,
                ComplianceVerify,
                FamilyContactsView,
                FamilyContactsCreate,
                FamilyContactsUpdate,
                FamilyContactsDelete,
                HomesView,
                HomesUpdate,
                CaregiversView,
                CaregiversCreate,
                CaregiversUpdate,
                CaregiversAssign,
                CaregiversManageCertifications,
                CaregiversManageDocuments,
                InquiriesView,
                InquiriesUpdate,
                InquiriesConvert,
                ReportsView,
                ReportsGenerate,
                ReportsExport,
                ReportsDelete,
                ReportsSchedule,
                ReportsManage,
                AnalyticsView,
                DocumentsView,
                DocumentsCreate,
                DocumentsUpdate,
                DocumentsDelete,
                DocumentsExtract,
                DocumentsClassify,
                DocumentsGenerate,
                ToursViewAll,
                ToursConfirm,
                ToursReschedule,
                ToursCancel,
                ToursManageSlots,
            ],
            UserRole::Caregiver => &[
                ResidentsView,
                AssessmentsView,
                AssessmentsCreate,
                IncidentsView,
                IncidentsCreate,
                IncidentsUpdate,
                ComplianceView,
                FamilyContactsView,
                DocumentsView,
                DocumentsCreate,
            ],
            UserRole::Family => &[
                ResidentsView,
                AssessmentsView,
                IncidentsView,
                ComplianceView,
                FamilyContactsView,
                FamilyContactsCreate,
                FamilyContactsUpdate,
                HomesView,
                InquiriesView,
                InquiriesCreate,
                DocumentsView,
                DocumentsCreate,
                ToursRequest,
                ToursView,
                ToursCancel,
                ToursReschedule,
            ],
            UserRole::Staff => &[
                ResidentsView,
                AssessmentsView,
                AssessmentsCreate,
                IncidentsView,
                IncidentsCreate,
                ComplianceView,
                FamilyContactsView,
                HomesView,
                CaregiversView,
                InquiriesView,
                ReportsView,
            ],
            UserRole::Affiliate => &[HomesView, InquiriesCreate, ReportsView],
            UserRole::Provider => &[InquiriesView, InquiriesUpdate, ReportsView],
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserRole::ALL
            .iter()
            .copied()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| format!("unknown user role: {}", s))
    }
}

/// Declares the permission enum together with its dotted wire names
macro_rules! permissions {
    ($($variant:ident => $name:literal,)+) => {
        /// Every permission known to the system
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Permission {
            $($variant,)+
        }

        impl Permission {
            pub const ALL: &'static [Permission] = &[$(Permission::$variant,)+];

            /// Dotted name, e.g. `residents.view`
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Permission::$variant => $name,)+
                }
            }
        }
    };
}

permissions! {
    ResidentsView => "residents.view",
    ResidentsCreate => "residents.create",
    ResidentsUpdate => "residents.update",
    ResidentsDelete => "residents.delete",
    ResidentsViewAll => "residents.view_all",

    AssessmentsView => "assessments.view",
    AssessmentsCreate => "assessments.create",
    AssessmentsUpdate => "assessments.update",
    AssessmentsDelete => "assessments.delete",

    IncidentsView => "incidents.view",
    IncidentsCreate => "incidents.create",
    IncidentsUpdate => "incidents.update",
    IncidentsDelete => "incidents.delete",
    IncidentsResolve => "incidents.resolve",

    ComplianceView => "compliance.view",
    ComplianceCreate => "compliance.create",
    ComplianceUpdate => "compliance.update",
    ComplianceDelete => "compliance.delete",
    ComplianceVerify => "compliance.verify",

    FamilyContactsView => "family_contacts.view",
    FamilyContactsCreate => "family_contacts.create",
    FamilyContactsUpdate => "family_contacts.update",
    FamilyContactsDelete => "family_contacts.delete",

    HomesView => "homes.view",
    HomesCreate => "homes.create",
    HomesUpdate => "homes.update",
    HomesDelete => "homes.delete",
    HomesViewAll => "homes.view_all",

    CaregiversView => "caregivers.view",
    CaregiversCreate => "caregivers.create",
    CaregiversUpdate => "caregivers.update",
    CaregiversDelete => "caregivers.delete",
    CaregiversViewAll => "caregivers.view_all",
    CaregiversAssign => "caregivers.assign",
    CaregiversManageCertifications => "caregivers.manage_certifications",
    CaregiversManageDocuments => "caregivers.manage_documents",

    InquiriesView => "inquiries.view",
    InquiriesCreate => "inquiries.create",
    InquiriesUpdate => "inquiries.update",
    InquiriesDelete => "inquiries.delete",
    InquiriesViewAll => "inquiries.view_all",
    InquiriesConvert => "inquiries.convert",

    OperatorsView => "operators.view",
    OperatorsCreate => "operators.create",
    OperatorsUpdate => "operators.update",
    OperatorsDelete => "operators.delete",

    UsersView => "users.view",
    UsersCreate => "users.create",
    UsersUpdate => "users.update",
    UsersDelete => "users.delete",
    UsersViewAll => "users.view_all",

    SystemSettings => "system.settings",
    AuditLogsView => "audit_logs.view",

    ReportsView => "reports.view",
    ReportsGenerate => "reports.generate",
    ReportsExport => "reports.export",
    ReportsDelete => "reports.delete",
    ReportsSchedule => "reports.schedule",
    ReportsManage => "reports.manage",
    AnalyticsView => "analytics.view",

    DocumentsView => "documents.view",
    DocumentsCreate => "documents.create",
    DocumentsUpdate => "documents.update",
    DocumentsDelete => "documents.delete",
    DocumentsViewAll => "documents.view_all",
    DocumentsExtract => "documents.extract",
    DocumentsClassify => "documents.classify",
    DocumentsManageTemplates => "documents.manage_templates",
    DocumentsGenerate => "documents.generate",

    ToursRequest => "tours.request",
    ToursView => "tours.view",
    ToursViewAll => "tours.view_all",
    ToursConfirm => "tours.confirm",
    ToursReschedule => "tours.reschedule",
    ToursCancel => "tours.cancel",
    ToursManageSlots => "tours.manage_slots",

    AdminFullAccess => "admin.full_access",
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Permission {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

pub fn has_permission(role: UserRole, permission: Permission) -> bool {
    role.permissions().contains(&permission)
}

/// Ownership data for a single resource, used by [`can_access`]
#[derive(Debug, Clone, Default)]
pub struct ResourceScope {
    pub owner_id: Option<Uuid>,
    pub operator_id: Option<Uuid>,
    pub family_id: Option<Uuid>,
}

/// Permission check combined with resource ownership
/// DOCUMENTATION: Without a scope or user the permission alone decides.
/// Caregiver assignment is enforced by the queries themselves.
pub fn can_access(
    role: UserRole,
    permission: Permission,
    scope: Option<&ResourceScope>,
    user_id: Option<Uuid>,
) -> bool {
    if !has_permission(role, permission) {
        return false;
    }

    let (scope, user_id) = match (scope, user_id) {
        (Some(scope), Some(user_id)) => (scope, user_id),
        _ => return true,
    };

    match role {
        UserRole::Admin => true,
        UserRole::Operator => scope.operator_id == Some(user_id),
        UserRole::Family => {
            scope.family_id == Some(user_id) || scope.owner_id == Some(user_id)
        }
        UserRole::Caregiver => true,
        UserRole::Staff | UserRole::Affiliate | UserRole::Provider => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum ResourceAction {
    View,
    Create,
    Update,
    Delete,
    Verify,
    Resolve,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum ResourceType {
    Resident,
    Assessment,
    Incident,
    Compliance,
    FamilyContact,
    Home,
    Caregiver,
    Inquiry,
    Operator,
    User,
}

/// Map a resource type and action to the permission guarding it
pub fn permission_for_resource(
    resource: ResourceType,
    action: ResourceAction,
) -> Option<Permission> {
    use Permission::*;
    use ResourceAction as A;
    use ResourceType as R;

    let permission = match (resource, action) {
        (R::Resident, A::View) => ResidentsView,
        (R::Resident, A::Create) => ResidentsCreate,
        (R::Resident, A::Update) => ResidentsUpdate,
        (R::Resident, A::Delete) => ResidentsDelete,

        (R::Assessment, A::View) => AssessmentsView,
        (R::Assessment, A::Create) => AssessmentsCreate,
        (R::Assessment, A::Update) => AssessmentsUpdate,
        (R::Assessment, A::Delete) => AssessmentsDelete,

        (R::Incident, A::View) => IncidentsView,
        (R::Incident, A::Create) => IncidentsCreate,
        (R::Incident, A::Update) => IncidentsUpdate,
        (R::Incident, A::Delete) => IncidentsDelete,
        (R::Incident, A::Resolve) => IncidentsResolve,

        (R::Compliance, A::View) => ComplianceView,
        (R::Compliance, A::Create) => ComplianceCreate,
        (R::Compliance, A::Update) => ComplianceUpdate,
        (R::Compliance, A::Delete) => ComplianceDelete,
        (R::Compliance, A::Verify) => ComplianceVerify,

        (R::FamilyContact, A::View) => FamilyContactsView,
        (R::FamilyContact, A::Create) => FamilyContactsCreate,
        (R::FamilyContact, A::Update) => FamilyContactsUpdate,
        (R::FamilyContact, A::Delete) => FamilyContactsDelete,

        (R::Home, A::View) => HomesView,
        (R::Home, A::Create) => HomesCreate,
        (R::Home, A::Update) => HomesUpdate,
        (R::Home, A::Delete) => HomesDelete,

        (R::Caregiver, A::View) => CaregiversView,
        (R::Caregiver, A::Create) => CaregiversCreate,
        (R::Caregiver, A::Update) => CaregiversUpdate,
        (R::Caregiver, A::Delete) => CaregiversDelete,

        (R::Inquiry, A::View) => InquiriesView,
        (R::Inquiry, A::Create) => InquiriesCreate,
        (R::Inquiry, A::Update) => InquiriesUpdate,
        (R::Inquiry, A::Delete) => InquiriesDelete,

        (R::Operator, A::View) => OperatorsView,
        (R::Operator, A::Create) => OperatorsCreate,
        (R::Operator, A::Update) => OperatorsUpdate,
        (R::Operator, A::Delete) => OperatorsDelete,

        (R::User, A::View) => UsersView,
        (R::User, A::Create) => UsersCreate,
        (R::User, A::Update) => UsersUpdate,
        (R::User, A::Delete) => UsersDelete,

        _ => return None,
    };
    Some(permission)
}

pub fn can_perform_action(role: UserRole, resource: ResourceType, action: ResourceAction) -> bool {
    permission_for_resource(resource, action)
        .map(|p| has_permission(role, p))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_holds_every_permission() {
        for permission in Permission::ALL {
            assert!(has_permission(UserRole::Admin, *permission), "{}", permission);
        }
    }

    #[test]
    fn test_every_role_round_trips_through_its_name() {
        for role in UserRole::ALL {
            assert_eq!(role.as_str().parse::<UserRole>(), Ok(role));
        }
        assert!("SUPERUSER".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_permission_names_are_unique() {
        let mut names: Vec<&str> = Permission::ALL.iter().map(|p| p.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Permission::ALL.len());
    }

    #[test]
    fn test_family_permissions() {
        assert!(has_permission(UserRole::Family, Permission::InquiriesCreate));
        assert!(has_permission(UserRole::Family, Permission::ToursRequest));
        assert!(!has_permission(UserRole::Family, Permission::InquiriesUpdate));
        assert!(!has_permission(UserRole::Family, Permission::CaregiversView));
    }

    #[test]
    fn test_can_access_scopes_by_role() {
        let operator_user = Uuid::new_v4();
        let family_user = Uuid::new_v4();
        let scope = ResourceScope {
            operator_id: Some(operator_user),
            family_id: Some(family_user),
            ..Default::default()
        };

        assert!(can_access(
            UserRole::Operator,
            Permission::ResidentsView,
            Some(&scope),
            Some(operator_user)
        ));
        assert!(!can_access(
            UserRole::Operator,
            Permission::ResidentsView,
            Some(&scope),
            Some(family_user)
        ));
        assert!(can_access(
            UserRole::Family,
            Permission::ResidentsView,
            Some(&scope),
            Some(family_user)
        ));
        assert!(can_access(
            UserRole::Admin,
            Permission::ResidentsView,
            Some(&scope),
            Some(Uuid::new_v4())
        ));
        // Staff holds the permission but has no ownership rule
        assert!(!can_access(
            UserRole::Staff,
            Permission::ResidentsView,
            Some(&scope),
            Some(Uuid::new_v4())
        ));
        // No scope: permission alone decides
        assert!(can_access(UserRole::Staff, Permission::ResidentsView, None, None));
        assert!(!can_access(UserRole::Provider, Permission::ResidentsView, None, None));
    }

    #[test]
    fn test_resource_action_mapping() {
        assert_eq!(
            permission_for_resource(ResourceType::Compliance, ResourceAction::Verify),
            Some(Permission::ComplianceVerify)
        );
        assert_eq!(
            permission_for_resource(ResourceType::FamilyContact, ResourceAction::View),
            Some(Permission::FamilyContactsView)
        );
        assert_eq!(
            permission_for_resource(ResourceType::Resident, ResourceAction::Resolve),
            None
        );
        assert!(can_perform_action(
            UserRole::Caregiver,
            ResourceType::Incident,
            ResourceAction::Update
        ));
        assert!(!can_perform_action(
            UserRole::Caregiver,
            ResourceType::Incident,
            ResourceAction::Resolve
        ));
    }
}
