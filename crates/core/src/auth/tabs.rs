//! Navigation tabs visible per role.

use serde::Serialize;

use super::rbac::{Role, is_developer};

/// A navigation tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    /// Always visible.
    Dashboard,
    /// Employee and up.
    Transactions,
    /// Holder and up.
    Approvals,
    /// Accountant and up.
    Reports,
    /// Accountant and up.
    Audit,
    /// Manager and up.
    Team,
    /// Admin and up.
    Accounts,
    /// Admin and up.
    Categories,
    /// Admin and up.
    Budgets,
    /// Admin and up.
    Settings,
    /// Developer only, regardless of level.
    Debug,
}

/// How a tab is gated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabGate {
    /// Visible at this level and above. Level 0 means everyone.
    Level(u8),
    /// Visible to the developer role only.
    DeveloperOnly,
}

/// All tabs in display order.
pub const ALL_TABS: [Tab; 11] = [
    Tab::Dashboard,
    Tab::Transactions,
    Tab::Approvals,
    Tab::Reports,
    Tab::Audit,
    Tab::Team,
    Tab::Accounts,
    Tab::Categories,
    Tab::Budgets,
    Tab::Settings,
    Tab::Debug,
];

impl Tab {
    /// Returns the string representation of the tab.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Transactions => "transactions",
            Self::Approvals => "approvals",
            Self::Reports => "reports",
            Self::Audit => "audit",
            Self::Team => "team",
            Self::Accounts => "accounts",
            Self::Categories => "categories",
            Self::Budgets => "budgets",
            Self::Settings => "settings",
            Self::Debug => "debug",
        }
    }

    /// The gate for this tab.
    #[must_use]
    pub const fn gate(&self) -> TabGate {
        match self {
            Self::Dashboard => TabGate::Level(0),
            Self::Transactions => TabGate::Level(Role::Employee.level()),
            Self::Approvals => TabGate::Level(Role::Holder.level()),
            Self::Reports | Self::Audit => TabGate::Level(Role::Accountant.level()),
            Self::Team => TabGate::Level(Role::Manager.level()),
            Self::Accounts | Self::Categories | Self::Budgets | Self::Settings => {
                TabGate::Level(Role::Admin.level())
            }
            Self::Debug => TabGate::DeveloperOnly,
        }
    }
}

/// `true` when `tab` is shown to `role`.
#[must_use]
pub const fn is_tab_visible(role: Role, tab: Tab) -> bool {
    match tab.gate() {
        TabGate::Level(required) => role.level() >= required,
        TabGate::DeveloperOnly => is_developer(role),
    }
}

/// Tabs shown to `role`, in display order.
#[must_use]
pub fn visible_tabs(role: Role) -> Vec<Tab> {
    ALL_TABS
        .into_iter()
        .filter(|tab| is_tab_visible(role, *tab))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_employee_tabs() {
        assert_eq!(
            visible_tabs(Role::Employee),
            vec![Tab::Dashboard, Tab::Transactions]
        );
    }

    #[test]
    fn test_holder_tabs() {
        assert_eq!(
            visible_tabs(Role::Holder),
            vec![Tab::Dashboard, Tab::Transactions, Tab::Approvals]
        );
    }

    #[test]
    fn test_accountant_sees_reports_and_audit() {
        let tabs = visible_tabs(Role::Accountant);
        assert!(tabs.contains(&Tab::Reports));
        assert!(tabs.contains(&Tab::Audit));
        assert!(!tabs.contains(&Tab::Team));
    }

    #[test]
    fn test_super_admin_has_no_debug() {
        let tabs = visible_tabs(Role::SuperAdmin);
        assert_eq!(tabs.len(), 10);
        assert!(!tabs.contains(&Tab::Debug));
    }

    #[test]
    fn test_developer_sees_everything() {
        assert_eq!(visible_tabs(Role::Developer), ALL_TABS.to_vec());
    }

    #[test]
    fn test_tab_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Tab::Approvals).unwrap(), "\"approvals\"");
        assert_eq!(Tab::Approvals.as_str(), "approvals");
    }
}
