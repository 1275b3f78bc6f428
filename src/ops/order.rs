use indexmap::IndexMap;

use crate::model::menu::MenuRegistry;

/// Effective group item orders, keyed by group key in registry order.
pub type GroupItemOrder = IndexMap<String, Vec<String>>;

/// Merge a saved custom ordering into the canonical key list.
///
/// Saved keys that still exist come first, in saved order. Canonical keys the
/// saved order never mentioned follow in canonical order. Saved keys that no
/// longer exist are dropped, as are repeats. The result is always a
/// permutation of `canonical`.
pub fn merge_order<K: Eq + Clone>(canonical: &[K], saved: Option<&[K]>) -> Vec<K> {
    let saved = match saved {
        Some(s) => s,
        None => return canonical.to_vec(),
    };

    let mut remaining: Vec<K> = canonical.to_vec();
    let mut result = Vec::with_capacity(canonical.len());
    for key in saved {
        if let Some(pos) = remaining.iter().position(|k| k == key) {
            result.push(remaining.remove(pos));
        }
    }
    result.extend(remaining);
    result
}

/// Relocate `moved` to the position currently held by `target`.
///
/// Returns the input unchanged when `moved == target` or when either key is
/// not in `order`. All other elements keep their relative order.
pub fn move_key<K: Eq + Clone>(order: &[K], moved: &K, target: &K) -> Vec<K> {
    if moved == target {
        return order.to_vec();
    }
    let (from, to) = match (
        order.iter().position(|k| k == moved),
        order.iter().position(|k| k == target),
    ) {
        (Some(from), Some(to)) => (from, to),
        _ => return order.to_vec(),
    };

    let mut result = order.to_vec();
    let item = result.remove(from);
    result.insert(to, item);
    result
}

/// Write `reordered` back into the slots its keys hold in `full`.
///
/// Keys of `full` that `reordered` does not mention keep their positions, so
/// a reorder of the visible subset leaves hidden keys where they were.
pub fn overlay_order<K: Eq + Clone>(full: &[K], reordered: &[K]) -> Vec<K> {
    let mut replacements = reordered.iter();
    full.iter()
        .map(|k| {
            if reordered.contains(k) {
                replacements.next().unwrap_or(k).clone()
            } else {
                k.clone()
            }
        })
        .collect()
}

/// Apply [`merge_order`] to every group of the registry independently.
pub fn merge_group_orders(
    registry: &MenuRegistry,
    saved: Option<&IndexMap<String, Vec<String>>>,
) -> GroupItemOrder {
    let mut result = GroupItemOrder::new();
    for module in &registry.modules {
        for group in &module.groups {
            let canonical: Vec<String> = group.items.iter().map(|i| i.href.clone()).collect();
            let saved_group = saved.and_then(|m| m.get(&group.key)).map(|v| v.as_slice());
            result.insert(group.key.clone(), merge_order(&canonical, saved_group));
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn keys(s: &[&str]) -> Vec<String> {
        s.iter().map(|k| k.to_string()).collect()
    }

    fn sorted(mut v: Vec<String>) -> Vec<String> {
        v.sort();
        v
    }

    #[test]
    fn merge_without_saved_order_is_identity() {
        let canonical = keys(&["a", "b", "c"]);
        assert_eq!(merge_order(&canonical, None), canonical);
    }

    #[test]
    fn merge_appends_unmentioned_keys() {
        let canonical = keys(&["A", "B", "C"]);
        let saved = keys(&["C", "A"]);
        assert_eq!(merge_order(&canonical, Some(&saved)), keys(&["C", "A", "B"]));
    }

    #[test]
    fn merge_drops_retired_keys_and_duplicates() {
        let canonical = keys(&["a", "b", "d"]);
        let saved = keys(&["c", "b", "b", "x", "a"]);
        assert_eq!(merge_order(&canonical, Some(&saved)), keys(&["b", "a", "d"]));
    }

    #[test]
    fn merge_is_a_permutation_of_canonical() {
        let cases: Vec<(Vec<String>, Vec<String>)> = vec![
            (keys(&["a", "b", "c", "d"]), keys(&["d", "c"])),
            (keys(&["a"]), keys(&["z", "y"])),
            (keys(&[]), keys(&["a"])),
            (keys(&["a", "b"]), keys(&[])),
            (keys(&["e", "a", "b"]), keys(&["b", "a", "c"])),
        ];
        for (canonical, saved) in cases {
            let merged = merge_order(&canonical, Some(&saved));
            assert_eq!(sorted(merged.clone()), sorted(canonical.clone()));
            // Idempotent: re-merging the effective order changes nothing
            assert_eq!(merge_order(&canonical, Some(&merged)), merged);
        }
    }

    #[test]
    fn move_to_self_is_noop() {
        let order = keys(&["a", "b", "c"]);
        assert_eq!(move_key(&order, &"b".to_string(), &"b".to_string()), order);
        assert_eq!(move_key(&order, &"q".to_string(), &"q".to_string()), order);
    }

    #[test]
    fn move_with_unknown_key_is_noop() {
        let order = keys(&["a", "b", "c"]);
        assert_eq!(move_key(&order, &"x".to_string(), &"a".to_string()), order);
        assert_eq!(move_key(&order, &"a".to_string(), &"x".to_string()), order);
    }

    #[test]
    fn move_forward_and_backward() {
        let order = keys(&["a", "b", "c", "d"]);
        assert_eq!(
            move_key(&order, &"a".to_string(), &"c".to_string()),
            keys(&["b", "c", "a", "d"])
        );
        assert_eq!(
            move_key(&order, &"d".to_string(), &"b".to_string()),
            keys(&["a", "d", "b", "c"])
        );
    }

    #[test]
    fn move_preserves_elements() {
        let order = keys(&["a", "b", "c", "d", "e"]);
        for moved in &order {
            for target in &order {
                let result = move_key(&order, moved, target);
                assert_eq!(sorted(result), sorted(order.clone()));
            }
        }
    }

    #[test]
    fn group_scenario_merge_then_move() {
        let canonical = keys(&["x", "y", "z"]);
        let saved = keys(&["z", "x"]);
        let effective = merge_order(&canonical, Some(&saved));
        assert_eq!(effective, keys(&["z", "x", "y"]));
        assert_eq!(
            move_key(&effective, &"x".to_string(), &"z".to_string()),
            keys(&["x", "z", "y"])
        );
    }

    #[test]
    fn overlay_keeps_hidden_slots() {
        let full = keys(&["erp", "hrm", "customs", "crm"]);
        let visible = keys(&["crm", "hrm"]);
        assert_eq!(
            overlay_order(&full, &visible),
            keys(&["erp", "crm", "customs", "hrm"])
        );
        assert_eq!(overlay_order(&full, &keys(&[])), full);
    }

    #[test]
    fn group_orders_cover_every_group() {
        let registry = MenuRegistry::builtin().unwrap();
        let mut saved = IndexMap::new();
        saved.insert(
            "crm-sales".to_string(),
            keys(&["/crm/orders", "/crm/retired"]),
        );
        saved.insert("gone-group".to_string(), keys(&["/x"]));

        let merged = merge_group_orders(&registry, Some(&saved));
        let group_count: usize = registry.modules.iter().map(|m| m.groups.len()).sum();
        assert_eq!(merged.len(), group_count);
        assert!(!merged.contains_key("gone-group"));
        assert_eq!(
            merged["crm-sales"],
            keys(&["/crm/orders", "/crm/opportunities", "/crm/quotes"])
        );
        assert_eq!(
            merged["hrm-people"],
            keys(&["/hrm/employees", "/hrm/departments", "/hrm/positions"])
        );
    }
}
