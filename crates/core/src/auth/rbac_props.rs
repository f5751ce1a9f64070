//! Property-based tests for the role hierarchy and tab visibility.

use proptest::prelude::*;

use crate::auth::rbac::{Role, VALID_ROLES, can_approve, can_generate_reports, has_permission};
use crate::auth::tabs::{ALL_TABS, Tab, is_tab_visible, visible_tabs};

fn arb_role() -> impl Strategy<Value = Role> {
    prop::sample::select(VALID_ROLES.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A higher role sees every tab a lower role sees, the debug tab aside.
    #[test]
    fn prop_tabs_monotonic_in_level(low in arb_role(), high in arb_role()) {
        prop_assume!(low.level() < high.level());
        let high_tabs = visible_tabs(high);
        for tab in visible_tabs(low) {
            if tab == Tab::Debug {
                continue;
            }
            prop_assert!(high_tabs.contains(&tab), "{high} lost {tab:?} visible to {low}");
        }
    }

    /// The debug tab depends on the exact role, never on level.
    #[test]
    fn prop_debug_tab_is_developer_only(role in arb_role()) {
        prop_assert_eq!(is_tab_visible(role, Tab::Debug), role == Role::Developer);
    }

    /// Permission checks are monotonic in the required level.
    #[test]
    fn prop_has_permission_monotonic(role in arb_role(), a in 0u8..10, b in 0u8..10) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        if has_permission(role, hi) {
            prop_assert!(has_permission(role, lo));
        }
    }

    /// Level-gated predicates never flip off when the role goes up.
    #[test]
    fn prop_predicates_monotonic(low in arb_role(), high in arb_role()) {
        prop_assume!(low.level() <= high.level());
        if can_approve(low) {
            prop_assert!(can_approve(high));
        }
        if can_generate_reports(low) {
            prop_assert!(can_generate_reports(high));
        }
    }

    /// Dashboard is visible to everyone.
    #[test]
    fn prop_dashboard_always_visible(role in arb_role()) {
        prop_assert!(visible_tabs(role).first() == Some(&ALL_TABS[0]));
    }
}
