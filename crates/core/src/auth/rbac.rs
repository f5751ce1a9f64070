//! Role hierarchy and the capability predicates derived from it.
//!
//! Roles form a strict total order. Every capability is a single level
//! comparison, except expense submission, which holders are excluded from.

use std::fmt;

use serde::{Deserialize, Serialize};

/// User roles, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Role {
    /// Submits expenses.
    Employee = 1,
    /// Approves and rejects, but does not submit.
    Holder = 2,
    /// Generates reports and reads the audit trail.
    Accountant = 3,
    /// Manages the team.
    Manager = 4,
    /// Manages accounts, categories, budgets and settings.
    Admin = 5,
    /// The only role allowed to change other users' roles.
    SuperAdmin = 6,
    /// Everything, plus the debug tab.
    Developer = 7,
}

/// Every valid role in ascending level order.
pub const VALID_ROLES: [Role; 7] = [
    Role::Employee,
    Role::Holder,
    Role::Accountant,
    Role::Manager,
    Role::Admin,
    Role::SuperAdmin,
    Role::Developer,
];

impl Role {
    /// Parse a role from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "employee" => Some(Self::Employee),
            "holder" => Some(Self::Holder),
            "accountant" => Some(Self::Accountant),
            "manager" => Some(Self::Manager),
            "admin" => Some(Self::Admin),
            "super_admin" => Some(Self::SuperAdmin),
            "developer" => Some(Self::Developer),
            _ => None,
        }
    }

    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Holder => "holder",
            Self::Accountant => "accountant",
            Self::Manager => "manager",
            Self::Admin => "admin",
            Self::SuperAdmin => "super_admin",
            Self::Developer => "developer",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Employee => "Employee",
            Self::Holder => "Holder",
            Self::Accountant => "Accountant",
            Self::Manager => "Manager",
            Self::Admin => "Admin",
            Self::SuperAdmin => "Super Admin",
            Self::Developer => "Developer",
        }
    }

    /// Hierarchy level, 1 through 7.
    #[must_use]
    pub const fn level(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Level of a role given as text; 0 when the text names no role.
#[must_use]
pub fn level_of(role: &str) -> u8 {
    Role::parse(role).map_or(0, Role::level)
}

/// Display name for a role given as text, falling back to the text itself.
#[must_use]
pub fn role_display_name(role: &str) -> String {
    Role::parse(role).map_or_else(|| role.to_string(), |r| r.display_name().to_string())
}

/// `true` when `role` is at or above `required_level`.
#[must_use]
pub const fn has_permission(role: Role, required_level: u8) -> bool {
    role.level() >= required_level
}

/// Submission is open to every role except holder.
#[must_use]
pub const fn can_submit_expenses(role: Role) -> bool {
    matches!(
        role,
        Role::Employee
            | Role::Accountant
            | Role::Manager
            | Role::Admin
            | Role::SuperAdmin
            | Role::Developer
    )
}

/// Approve or reject pending transactions.
#[must_use]
pub const fn can_approve(role: Role) -> bool {
    has_permission(role, Role::Holder.level())
}

/// See every transaction of the company.
#[must_use]
pub const fn can_view_all_expenses(role: Role) -> bool {
    has_permission(role, Role::Holder.level())
}

/// Generate reports and read the audit trail.
#[must_use]
pub const fn can_generate_reports(role: Role) -> bool {
    has_permission(role, Role::Accountant.level())
}

/// Manage team membership.
#[must_use]
pub const fn can_manage_team(role: Role) -> bool {
    has_permission(role, Role::Manager.level())
}

/// Create, edit and deactivate accounts.
#[must_use]
pub const fn can_manage_accounts(role: Role) -> bool {
    has_permission(role, Role::Admin.level())
}

/// Create, edit and deactivate categories.
#[must_use]
pub const fn can_manage_categories(role: Role) -> bool {
    has_permission(role, Role::Admin.level())
}

/// Create, edit and deactivate budgets.
#[must_use]
pub const fn can_manage_budgets(role: Role) -> bool {
    has_permission(role, Role::Admin.level())
}

/// Reach company settings.
#[must_use]
pub const fn can_access_settings(role: Role) -> bool {
    has_permission(role, Role::Admin.level())
}

/// Developer role, matched exactly.
#[must_use]
pub const fn is_developer(role: Role) -> bool {
    matches!(role, Role::Developer)
}

/// Super admin role, matched exactly. Higher levels do not qualify.
#[must_use]
pub const fn is_super_admin(role: Role) -> bool {
    matches!(role, Role::SuperAdmin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_levels_are_unique_and_ordered() {
        let levels: Vec<u8> = VALID_ROLES.iter().map(|r| r.level()).collect();
        assert_eq!(levels, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[rstest]
    #[case("employee", 1)]
    #[case("holder", 2)]
    #[case("accountant", 3)]
    #[case("manager", 4)]
    #[case("admin", 5)]
    #[case("super_admin", 6)]
    #[case("developer", 7)]
    #[case("SUPER_ADMIN", 6)]
    #[case("owner", 0)]
    #[case("", 0)]
    fn test_level_of(#[case] role: &str, #[case] expected: u8) {
        assert_eq!(level_of(role), expected);
    }

    #[test]
    fn test_parse_round_trips_as_str() {
        for role in VALID_ROLES {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Role::SuperAdmin.display_name(), "Super Admin");
        assert_eq!(role_display_name("holder"), "Holder");
        assert_eq!(role_display_name("intern"), "intern");
    }

    #[test]
    fn test_holder_cannot_submit() {
        assert!(!can_submit_expenses(Role::Holder));
        for role in VALID_ROLES.into_iter().filter(|r| *r != Role::Holder) {
            assert!(can_submit_expenses(role), "{role} should submit");
        }
    }

    #[rstest]
    #[case(Role::Employee, false, false, false, false)]
    #[case(Role::Holder, true, false, false, false)]
    #[case(Role::Accountant, true, true, false, false)]
    #[case(Role::Manager, true, true, true, false)]
    #[case(Role::Admin, true, true, true, true)]
    #[case(Role::SuperAdmin, true, true, true, true)]
    #[case(Role::Developer, true, true, true, true)]
    fn test_level_gated_predicates(
        #[case] role: Role,
        #[case] approve: bool,
        #[case] reports: bool,
        #[case] team: bool,
        #[case] manage: bool,
    ) {
        assert_eq!(can_approve(role), approve);
        assert_eq!(can_view_all_expenses(role), approve);
        assert_eq!(can_generate_reports(role), reports);
        assert_eq!(can_manage_team(role), team);
        assert_eq!(can_manage_accounts(role), manage);
        assert_eq!(can_manage_categories(role), manage);
        assert_eq!(can_manage_budgets(role), manage);
        assert_eq!(can_access_settings(role), manage);
    }

    #[test]
    fn test_exact_role_checks() {
        assert!(is_developer(Role::Developer));
        assert!(!is_developer(Role::SuperAdmin));
        assert!(is_super_admin(Role::SuperAdmin));
        assert!(!is_super_admin(Role::Developer));
        assert!(!is_super_admin(Role::Admin));
    }

    #[test]
    fn test_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&Role::SuperAdmin).unwrap(),
            "\"super_admin\""
        );
        let role: Role = serde_json::from_str("\"holder\"").unwrap();
        assert_eq!(role, Role::Holder);
    }
}
