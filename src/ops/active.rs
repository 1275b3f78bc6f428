use crate::model::menu::{MenuGroup, MenuItem, ModuleConfig};

/// Strip any query string or fragment from a location
fn route_path(current: &str) -> &str {
    let end = current.find(['?', '#']).unwrap_or(current.len());
    &current[..end]
}

/// Whether `href` is the current route or an ancestor of it on a path-segment
/// boundary (`/crm` matches `/crm/quotes` but not `/crmx`).
pub fn is_active(current: &str, href: &str) -> bool {
    let path = route_path(current);
    if path == href {
        return true;
    }
    path.strip_prefix(href)
        .is_some_and(|rest| rest.starts_with('/'))
}

pub fn is_item_active(current: &str, item: &MenuItem) -> bool {
    is_active(current, &item.href)
}

/// Any item of the group is active
pub fn is_group_active(current: &str, group: &MenuGroup) -> bool {
    group.items.iter().any(|item| is_item_active(current, item))
}

/// Any leaf of the module (dashboards included) is active
pub fn is_module_active(current: &str, module: &ModuleConfig) -> bool {
    module.leaves().any(|item| is_item_active(current, item))
}

/// The most specific leaf matching `current`: the longest matching href.
pub fn active_leaf<'a>(current: &str, module: &'a ModuleConfig) -> Option<&'a MenuItem> {
    module
        .leaves()
        .filter(|item| is_item_active(current, item))
        .max_by_key(|item| item.href.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::menu::MenuRegistry;

    #[test]
    fn exact_and_segment_prefix_match() {
        assert!(is_active("/crm/quotes", "/crm/quotes"));
        assert!(is_active("/crm/quotes/123", "/crm/quotes"));
        assert!(!is_active("/crm/quotesx", "/crm/quotes"));
        assert!(!is_active("/crmx", "/crm"));
        assert!(!is_active("/crm", "/crm/quotes"));
    }

    #[test]
    fn trailing_slash_query_and_fragment() {
        assert!(is_active("/crm/quotes/", "/crm/quotes"));
        assert!(is_active("/crm/quotes?page=2", "/crm/quotes"));
        assert!(is_active("/crm/quotes#top", "/crm/quotes"));
        assert!(!is_active("/crm/quotesx?x=/", "/crm/quotes"));
    }

    #[test]
    fn root_only_matches_itself() {
        assert!(is_active("/", "/"));
        assert!(!is_active("/crm", "/"));
    }

    #[test]
    fn activeness_propagates_to_group_and_module() {
        let registry = MenuRegistry::builtin().unwrap();
        let hrm = registry.module("hrm").unwrap();
        let people = registry.group("hrm-people").unwrap();
        let time = registry.group("hrm-time").unwrap();
        let path = "/hrm/employees/42/edit";

        assert!(is_group_active(path, people));
        assert!(!is_group_active(path, time));
        assert!(is_module_active(path, hrm));
        assert!(!is_module_active(path, registry.module("crm").unwrap()));
    }

    #[test]
    fn dashboard_entries_count_for_module() {
        let registry = MenuRegistry::builtin().unwrap();
        let crm = registry.module("crm").unwrap();
        assert!(is_module_active("/crm", crm));
        assert!(!crm.groups.iter().any(|g| is_group_active("/crm", g)));
    }

    #[test]
    fn active_leaf_prefers_most_specific() {
        let registry = MenuRegistry::builtin().unwrap();
        let crm = registry.module("crm").unwrap();
        // Both the dashboard ("/crm") and the quotes item match
        let leaf = active_leaf("/crm/quotes/7", crm).unwrap();
        assert_eq!(leaf.href, "/crm/quotes");
        assert_eq!(active_leaf("/crm", crm).unwrap().href, "/crm");
        assert!(active_leaf("/erp", crm).is_none());
    }

    #[test]
    fn recomputed_per_navigation() {
        let registry = MenuRegistry::builtin().unwrap();
        let sales = registry.group("crm-sales").unwrap();
        let mut path = String::from("/crm/quotes");
        assert!(is_group_active(&path, sales));
        path = String::from("/crm/accounts");
        assert!(!is_group_active(&path, sales));
    }
}
