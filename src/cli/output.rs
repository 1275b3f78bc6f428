use indexmap::IndexMap;
use serde::Serialize;

use crate::model::menu::MenuItem;
use crate::ops::active::{is_active, is_group_active, is_module_active};
use crate::ops::favorites::project_favorites;
use crate::tui::sidebar::{NavRow, RowKind, Sidebar};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct ItemJson {
    pub label: String,
    pub href: String,
    pub active: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub starred: bool,
}

#[derive(Serialize)]
pub struct GroupJson {
    pub key: String,
    pub label: String,
    pub active: bool,
    pub items: Vec<ItemJson>,
}

#[derive(Serialize)]
pub struct ModuleJson {
    pub key: String,
    pub label: String,
    pub active: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dashboard: Vec<ItemJson>,
    pub groups: Vec<GroupJson>,
}

#[derive(Serialize)]
pub struct TreeJson {
    pub path: String,
    pub enablement: &'static str,
    pub favorites: Vec<ItemJson>,
    pub modules: Vec<ModuleJson>,
}

#[derive(Serialize)]
pub struct ModuleSummaryJson {
    pub key: String,
    pub label: String,
}

#[derive(Serialize)]
pub struct ModulesJson {
    pub enablement: &'static str,
    pub modules: Vec<ModuleSummaryJson>,
}

#[derive(Serialize)]
pub struct OrderJson {
    pub modules: Vec<String>,
    pub groups: IndexMap<String, Vec<String>>,
}

#[derive(Serialize)]
pub struct ActiveJson {
    pub path: String,
    pub trail: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

#[derive(Serialize)]
pub struct ValidateJson {
    pub valid: bool,
    pub modules: usize,
    pub groups: usize,
    pub leaves: usize,
    pub warnings: Vec<String>,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

fn item_to_json(sidebar: &Sidebar, item: &MenuItem) -> ItemJson {
    ItemJson {
        label: item.label.clone(),
        href: item.href.clone(),
        active: is_active(sidebar.path(), &item.href),
        starred: sidebar.state().favorites.is_starred(&item.href),
    }
}

/// The effective tree: visible modules in effective order, items in
/// effective order, favorites resolved against the registry.
pub fn tree_to_json(sidebar: &Sidebar) -> TreeJson {
    let path = sidebar.path();
    let favorites = project_favorites(sidebar.registry(), &sidebar.state().favorites)
        .into_iter()
        .map(|item| item_to_json(sidebar, item))
        .collect();

    let modules = sidebar
        .effective_modules()
        .into_iter()
        .map(|module| ModuleJson {
            key: module.key.clone(),
            label: module.label.clone(),
            active: is_module_active(path, module),
            dashboard: module
                .dashboard
                .iter()
                .map(|item| item_to_json(sidebar, item))
                .collect(),
            groups: module
                .groups
                .iter()
                .map(|group| GroupJson {
                    key: group.key.clone(),
                    label: group.label.clone(),
                    active: is_group_active(path, group),
                    items: sidebar
                        .effective_items(group)
                        .into_iter()
                        .map(|item| item_to_json(sidebar, item))
                        .collect(),
                })
                .collect(),
        })
        .collect();

    TreeJson {
        path: path.to_string(),
        enablement: sidebar.state().enabled.origin.as_str(),
        favorites,
        modules,
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// One line per row: two spaces per level, href after leaves, `*` on the
/// active trail, `★` on starred leaves.
pub fn format_row(row: &NavRow) -> String {
    let mut line = format!("{}{}", "  ".repeat(row.depth as usize), row.label);
    if let Some(href) = row.kind.href() {
        line.push_str("  ");
        line.push_str(href);
    }
    if row.affordances.star == Some(true) && !matches!(row.kind, RowKind::Favorite { .. }) {
        line.push_str(" \u{2605}");
    }
    if row.active {
        line.push_str(" *");
    }
    line
}

pub fn format_tree(rows: &[NavRow]) -> Vec<String> {
    rows.iter().map(format_row).collect()
}
