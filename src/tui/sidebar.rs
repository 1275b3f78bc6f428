use std::collections::HashSet;

use indexmap::IndexMap;

use crate::io::prefs::{self, PreferenceStore, Preferences, PrefsError};
use crate::model::menu::{MenuGroup, MenuItem, MenuRegistry, ModuleConfig};
use crate::ops::active::{active_leaf, is_active, is_group_active, is_module_active};
use crate::ops::enablement::{EnabledModules, visible_modules};
use crate::ops::favorites::{FavoritesSet, project_favorites};
use crate::ops::order::{GroupItemOrder, merge_order, move_key, overlay_order};

/// Render phase. `Static` paints without affordances; `Interactive` adds drag
/// handles and star toggles. Only the affordances differ between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Static,
    Interactive,
}

/// Client-only inputs to the tree: saved orders, favorites, enabled modules.
#[derive(Debug, Clone)]
pub struct ClientState {
    pub saved_module_order: Option<Vec<String>>,
    pub saved_group_orders: Option<IndexMap<String, Vec<String>>>,
    pub favorites: FavoritesSet,
    pub enabled: EnabledModules,
}

impl ClientState {
    /// What the first paint uses: no saved orders, no favorites.
    pub fn canonical(enabled: EnabledModules) -> Self {
        ClientState {
            saved_module_order: None,
            saved_group_orders: None,
            favorites: FavoritesSet::new(),
            enabled,
        }
    }

    pub fn loaded(prefs: Preferences, enabled: EnabledModules) -> Self {
        ClientState {
            saved_module_order: prefs.module_order,
            saved_group_orders: prefs.group_item_order,
            favorites: prefs.favorites,
            enabled,
        }
    }
}

/// Identity of a rendered row
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowKind {
    FavoritesHeader,
    Favorite { href: String },
    Module { key: String },
    Dashboard { module: String, href: String },
    Group { key: String },
    Item { group: String, href: String },
}

impl RowKind {
    /// Leaf rows navigate; header rows expand/collapse.
    pub fn href(&self) -> Option<&str> {
        match self {
            RowKind::Favorite { href }
            | RowKind::Dashboard { href, .. }
            | RowKind::Item { href, .. } => Some(href),
            _ => None,
        }
    }
}

/// Interactive-only decorations. Never part of the row's shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Affordances {
    pub drag_handle: bool,
    /// `Some(starred)` on leaves once interactive
    pub star: Option<bool>,
    pub dragging: bool,
    pub drop_target: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavRow {
    pub kind: RowKind,
    pub depth: u8,
    pub label: String,
    pub icon: String,
    pub active: bool,
    /// `Some` for collapsible rows
    pub expanded: Option<bool>,
    pub affordances: Affordances,
}

/// Everything about a row except its affordances
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowShape {
    pub kind: RowKind,
    pub depth: u8,
    pub label: String,
    pub icon: String,
    pub active: bool,
    pub expanded: Option<bool>,
}

impl NavRow {
    pub fn shape(&self) -> RowShape {
        RowShape {
            kind: self.kind.clone(),
            depth: self.depth,
            label: self.label.clone(),
            icon: self.icon.clone(),
            active: self.active,
            expanded: self.expanded,
        }
    }
}

/// A leaf was activated; the router decides what to do with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest(pub String);

/// Which ordered list a drag gesture reorders
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragScope {
    Modules,
    GroupItems(String),
}

/// A drag in progress: captured at gesture start, committed at gesture end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragGesture {
    pub scope: DragScope,
    pub moved: String,
    pub target: String,
}

impl DragGesture {
    /// Row identity of the dragged entry
    pub fn moved_row(&self) -> RowKind {
        match &self.scope {
            DragScope::Modules => RowKind::Module {
                key: self.moved.clone(),
            },
            DragScope::GroupItems(group) => RowKind::Item {
                group: group.clone(),
                href: self.moved.clone(),
            },
        }
    }
}

/// Scope and key a row would carry in a drag gesture, if draggable.
pub fn drag_identity(kind: &RowKind) -> Option<(DragScope, String)> {
    match kind {
        RowKind::Module { key } => Some((DragScope::Modules, key.clone())),
        RowKind::Item { group, href } => Some((DragScope::GroupItems(group.clone()), href.clone())),
        _ => None,
    }
}

/// Transient expand/collapse state. Discarded with the sidebar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenState {
    pub modules: HashSet<String>,
    pub groups: HashSet<String>,
}

impl OpenState {
    /// Modules start collapsed; a group starts open iff it holds the active route.
    pub fn initial(registry: &MenuRegistry, path: &str) -> Self {
        let groups = registry
            .modules
            .iter()
            .flat_map(|m| m.groups.iter())
            .filter(|g| is_group_active(path, g))
            .map(|g| g.key.clone())
            .collect();
        OpenState {
            modules: HashSet::new(),
            groups,
        }
    }
}

/// The navigation sidebar: owns the phase machine, the client state, the
/// transient open state and any drag in progress.
pub struct Sidebar {
    registry: MenuRegistry,
    store: Box<dyn PreferenceStore>,
    phase: Phase,
    state: ClientState,
    /// Loaded client state has replaced the canonical one
    client_loaded: bool,
    open: OpenState,
    path: String,
    drag: Option<DragGesture>,
}

impl Sidebar {
    pub fn new(
        registry: MenuRegistry,
        store: Box<dyn PreferenceStore>,
        fallback: EnabledModules,
        path: &str,
    ) -> Self {
        let open = OpenState::initial(&registry, path);
        Sidebar {
            registry,
            store,
            phase: Phase::Static,
            state: ClientState::canonical(fallback),
            client_loaded: false,
            open,
            path: path.to_string(),
            drag: None,
        }
    }

    pub fn registry(&self) -> &MenuRegistry {
        &self.registry
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn drag(&self) -> Option<&DragGesture> {
        self.drag.as_ref()
    }

    /// Read the durable records. Called once, after the first paint.
    pub fn load_preferences(&self) -> Preferences {
        Preferences::load(self.store.as_ref())
    }

    /// Apply loaded client state while still `Static`. The frame painted
    /// after this is the one [`Sidebar::upgrade`] must match. Happens once.
    pub fn apply_client_state(&mut self, prefs: Preferences, enabled: EnabledModules) -> bool {
        if self.client_loaded || self.phase == Phase::Interactive {
            return false;
        }
        self.state = ClientState::loaded(prefs, enabled);
        self.client_loaded = true;
        log::debug!(
            "client state applied: {} enabled module(s) ({}), {} favorite(s)",
            self.state.enabled.keys.len(),
            self.state.enabled.origin.as_str(),
            self.state.favorites.starred_count()
        );
        true
    }

    /// `Static` -> `Interactive`. Touches the phase and nothing else, so
    /// `rows()` keeps its shape across the call. One-way; refused until
    /// client state is applied.
    pub fn upgrade(&mut self) -> bool {
        if !self.client_loaded || self.phase == Phase::Interactive {
            return false;
        }
        self.phase = Phase::Interactive;
        log::debug!("sidebar interactive");
        true
    }

    /// Both mount steps back to back, for callers that never paint in between.
    pub fn complete_mount(&mut self, prefs: Preferences, enabled: EnabledModules) -> bool {
        self.apply_client_state(prefs, enabled) && self.upgrade()
    }

    /// Router push: the next `rows()` reflects the new path.
    pub fn set_path(&mut self, path: &str) {
        self.path = path.to_string();
    }

    // -----------------------------------------------------------------------
    // Effective orders

    /// Visible modules (enablement first), then the saved order merged in.
    pub fn effective_modules(&self) -> Vec<&ModuleConfig> {
        let visible = visible_modules(&self.registry.modules, &self.state.enabled.keys);
        let keys: Vec<String> = visible.iter().map(|m| m.key.clone()).collect();
        let order = merge_order(&keys, self.state.saved_module_order.as_deref());
        order
            .iter()
            .filter_map(|k| visible.iter().find(|m| &m.key == k).copied())
            .collect()
    }

    pub fn effective_module_keys(&self) -> Vec<String> {
        self.effective_modules()
            .iter()
            .map(|m| m.key.clone())
            .collect()
    }

    /// A group's items with the saved item order merged in
    pub fn effective_items<'a>(&self, group: &'a MenuGroup) -> Vec<&'a MenuItem> {
        let canonical: Vec<String> = group.items.iter().map(|i| i.href.clone()).collect();
        let saved = self
            .state
            .saved_group_orders
            .as_ref()
            .and_then(|m| m.get(&group.key))
            .map(|v| v.as_slice());
        merge_order(&canonical, saved)
            .iter()
            .filter_map(|href| group.items.iter().find(|i| &i.href == href))
            .collect()
    }

    pub fn effective_group_orders(&self) -> GroupItemOrder {
        crate::ops::order::merge_group_orders(&self.registry, self.state.saved_group_orders.as_ref())
    }

    // -----------------------------------------------------------------------
    // Rendering

    /// Build the flat row list. Structure depends only on client state, open
    /// state and path; the phase only switches affordances on.
    pub fn rows(&self) -> Vec<NavRow> {
        let interactive = self.phase == Phase::Interactive;
        let mut rows = Vec::new();

        let favorites = project_favorites(&self.registry, &self.state.favorites);
        if !favorites.is_empty() {
            rows.push(NavRow {
                kind: RowKind::FavoritesHeader,
                depth: 0,
                label: "Favorites".to_string(),
                icon: "star".to_string(),
                active: favorites.iter().any(|i| is_active(&self.path, &i.href)),
                expanded: None,
                affordances: Affordances::default(),
            });
            for item in favorites {
                let kind = RowKind::Favorite {
                    href: item.href.clone(),
                };
                rows.push(self.leaf_row(kind, item, 1, interactive, false));
            }
        }

        for module in self.effective_modules() {
            let expanded = self.open.modules.contains(&module.key);
            let kind = RowKind::Module {
                key: module.key.clone(),
            };
            rows.push(NavRow {
                affordances: self.drag_affordances(&kind, interactive),
                kind,
                depth: 0,
                label: module.label.clone(),
                icon: module.icon.clone(),
                active: is_module_active(&self.path, module),
                expanded: Some(expanded),
            });
            if !expanded {
                continue;
            }

            for item in &module.dashboard {
                let kind = RowKind::Dashboard {
                    module: module.key.clone(),
                    href: item.href.clone(),
                };
                rows.push(self.leaf_row(kind, item, 1, interactive, false));
            }

            for group in &module.groups {
                let open = self.open.groups.contains(&group.key);
                rows.push(NavRow {
                    kind: RowKind::Group {
                        key: group.key.clone(),
                    },
                    depth: 1,
                    label: group.label.clone(),
                    icon: String::new(),
                    active: is_group_active(&self.path, group),
                    expanded: Some(open),
                    affordances: Affordances::default(),
                });
                if !open {
                    continue;
                }
                for item in self.effective_items(group) {
                    let kind = RowKind::Item {
                        group: group.key.clone(),
                        href: item.href.clone(),
                    };
                    rows.push(self.leaf_row(kind, item, 2, interactive, true));
                }
            }
        }

        rows
    }

    fn leaf_row(
        &self,
        kind: RowKind,
        item: &MenuItem,
        depth: u8,
        interactive: bool,
        draggable: bool,
    ) -> NavRow {
        let mut affordances = if draggable {
            self.drag_affordances(&kind, interactive)
        } else {
            Affordances::default()
        };
        if interactive {
            affordances.star = Some(self.state.favorites.is_starred(&item.href));
        }
        NavRow {
            kind,
            depth,
            label: item.label.clone(),
            icon: item.icon.clone(),
            active: is_active(&self.path, &item.href),
            expanded: None,
            affordances,
        }
    }

    fn drag_affordances(&self, kind: &RowKind, interactive: bool) -> Affordances {
        let mut affordances = Affordances {
            drag_handle: interactive,
            ..Default::default()
        };
        if let (Some(drag), Some((scope, key))) = (&self.drag, drag_identity(kind))
            && drag.scope == scope
        {
            affordances.dragging = drag.moved == key;
            affordances.drop_target = drag.target == key && drag.moved != key;
        }
        affordances
    }

    /// Labels from module down to the active leaf, for breadcrumbs.
    pub fn active_trail(&self) -> Vec<String> {
        let mut best: Option<(&ModuleConfig, &MenuItem)> = None;
        for module in &self.registry.modules {
            if let Some(leaf) = active_leaf(&self.path, module)
                && best.is_none_or(|(_, b)| leaf.href.len() > b.href.len())
            {
                best = Some((module, leaf));
            }
        }
        let (module, leaf) = match best {
            Some(found) => found,
            None => return Vec::new(),
        };
        let mut trail = vec![module.label.clone()];
        if let Some(group) = module
            .groups
            .iter()
            .find(|g| g.items.iter().any(|i| i.href == leaf.href))
        {
            trail.push(group.label.clone());
        }
        trail.push(leaf.label.clone());
        trail
    }

    // -----------------------------------------------------------------------
    // Interaction

    /// Leaves request navigation; modules and groups toggle open.
    pub fn activate(&mut self, kind: &RowKind) -> Option<NavigationRequest> {
        match kind {
            RowKind::Module { key } => {
                self.toggle_module(key);
                None
            }
            RowKind::Group { key } => {
                self.toggle_group(key);
                None
            }
            RowKind::FavoritesHeader => None,
            leaf => leaf.href().map(|h| NavigationRequest(h.to_string())),
        }
    }

    pub fn toggle_module(&mut self, key: &str) {
        if !self.open.modules.remove(key) {
            self.open.modules.insert(key.to_string());
        }
    }

    pub fn toggle_group(&mut self, key: &str) {
        if !self.open.groups.remove(key) {
            self.open.groups.insert(key.to_string());
        }
    }

    pub fn set_expanded(&mut self, kind: &RowKind, expanded: bool) {
        let (set, key) = match kind {
            RowKind::Module { key } => (&mut self.open.modules, key),
            RowKind::Group { key } => (&mut self.open.groups, key),
            _ => return,
        };
        if expanded {
            set.insert(key.clone());
        } else {
            set.remove(key);
        }
    }

    /// Star or unstar a leaf and persist the favorites record. Returns the new
    /// starred state, or `None` outside the interactive phase.
    pub fn toggle_star(&mut self, href: &str) -> Result<Option<bool>, PrefsError> {
        if self.phase != Phase::Interactive || self.registry.find_leaf(href).is_none() {
            return Ok(None);
        }
        let starred = self.state.favorites.toggle(href);
        prefs::save_favorites(self.store.as_ref(), &self.state.favorites)?;
        Ok(Some(starred))
    }

    /// Gesture start: capture the moved key. Interactive only; modules and
    /// group items are draggable.
    pub fn begin_drag(&mut self, kind: &RowKind) -> bool {
        if self.phase != Phase::Interactive {
            return false;
        }
        match drag_identity(kind) {
            Some((scope, moved)) => {
                self.drag = Some(DragGesture {
                    scope,
                    target: moved.clone(),
                    moved,
                });
                true
            }
            None => false,
        }
    }

    /// Gesture move: visual only. Rows outside the gesture's scope are ignored.
    pub fn hover_drag(&mut self, kind: &RowKind) {
        if let (Some(drag), Some((scope, key))) = (&mut self.drag, drag_identity(kind))
            && drag.scope == scope
        {
            drag.target = key;
        }
    }

    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    /// Gesture end: one reorder, one write. Returns whether the order changed.
    pub fn end_drag(&mut self) -> Result<bool, PrefsError> {
        let drag = match self.drag.take() {
            Some(d) => d,
            None => return Ok(false),
        };

        match drag.scope {
            DragScope::Modules => {
                let current = self.effective_module_keys();
                let next = move_key(&current, &drag.moved, &drag.target);
                if next == current {
                    return Ok(false);
                }
                // Hidden modules keep their saved slots
                let saved = self.state.saved_module_order.as_deref();
                let base: Vec<String> = merge_order(&self.registry.module_keys(), saved)
                    .into_iter()
                    .filter(|k| current.contains(k) || saved.is_some_and(|s| s.contains(k)))
                    .collect();
                let record = overlay_order(&base, &next);
                prefs::save_module_order(self.store.as_ref(), &record)?;
                log::debug!("module order -> {:?}", record);
                self.state.saved_module_order = Some(record);
            }
            DragScope::GroupItems(group_key) => {
                let group = match self.registry.group(&group_key) {
                    Some(g) => g,
                    None => return Ok(false),
                };
                let current: Vec<String> = self
                    .effective_items(group)
                    .iter()
                    .map(|i| i.href.clone())
                    .collect();
                let next = move_key(&current, &drag.moved, &drag.target);
                if next == current {
                    return Ok(false);
                }
                let mut saved = self.state.saved_group_orders.clone().unwrap_or_default();
                saved.insert(group_key, next);
                prefs::save_group_item_order(self.store.as_ref(), &saved)?;
                self.state.saved_group_orders = Some(saved);
            }
        }
        Ok(true)
    }
}
