mod order;

use std::time::Duration;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::prefs::{self, PreferenceStore};
use crate::io::session::SessionContext;
use crate::ops::active::{active_leaf, is_active, is_module_active};
use crate::ops::enablement::EnabledModules;
use crate::ops::favorites::project_favorites;
use crate::tui::sidebar::{RowKind, Sidebar};
use crate::util::unicode::pad_to_width;

/// CLI commands block on the enabled-modules source; the TUI never does.
const FETCH_TIMEOUT: Duration = Duration::from_secs(12);

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let ctx = SessionContext::open(cli.config_dir.as_deref(), cli.menu.as_deref())?;
    let path = cli
        .path
        .clone()
        .unwrap_or_else(|| ctx.config.session.start_path.clone());

    match cli.command {
        None => Ok(()),
        Some(cmd) => match cmd {
            Commands::Tree(args) => cmd_tree(&ctx, &path, args, json),
            Commands::Modules => cmd_modules(&ctx, json),
            Commands::Order(args) => order::cmd_order(&ctx, args.action, json),
            Commands::Star(args) => cmd_star(&ctx, &args.href, json),
            Commands::Favorites => cmd_favorites(&ctx, &path, json),
            Commands::Active(args) => {
                let route = args.route.unwrap_or(path);
                cmd_active(&ctx, &route, json)
            }
            Commands::Validate => cmd_validate(&ctx, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fallback set, replaced by the source's answer if one arrives in time.
fn resolve_enabled(ctx: &SessionContext, fallback: EnabledModules) -> EnabledModules {
    let mut enabled = fallback;
    if let Some(fetch) = ctx.spawn_fetch() {
        enabled.resolve(fetch.wait(FETCH_TIMEOUT));
    }
    enabled
}

/// A sidebar over the on-disk store, already past its mount.
fn mounted_sidebar(ctx: &SessionContext, path: &str) -> Sidebar {
    let store: Box<dyn PreferenceStore> = Box::new(ctx.store.clone());
    let fallback = ctx.fallback();
    let mut sidebar = Sidebar::new(ctx.registry.clone(), store, fallback.clone(), path);
    let loaded = sidebar.load_preferences();
    sidebar.complete_mount(loaded, resolve_enabled(ctx, fallback));
    sidebar
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_tree(
    ctx: &SessionContext,
    path: &str,
    args: TreeArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut sidebar = mounted_sidebar(ctx, path);

    if json {
        println!("{}", serde_json::to_string_pretty(&tree_to_json(&sidebar))?);
        return Ok(());
    }

    for module in &ctx.registry.modules {
        if !args.collapsed || is_module_active(path, module) {
            sidebar.set_expanded(
                &RowKind::Module {
                    key: module.key.clone(),
                },
                true,
            );
        }
        if args.collapsed {
            continue;
        }
        for group in &module.groups {
            sidebar.set_expanded(
                &RowKind::Group {
                    key: group.key.clone(),
                },
                true,
            );
        }
    }

    for line in format_tree(&sidebar.rows()) {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_modules(ctx: &SessionContext, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let sidebar = mounted_sidebar(ctx, "/");
    let origin = sidebar.state().enabled.origin.as_str();
    let modules = sidebar.effective_modules();

    if json {
        let out = ModulesJson {
            enablement: origin,
            modules: modules
                .iter()
                .map(|m| ModuleSummaryJson {
                    key: m.key.clone(),
                    label: m.label.clone(),
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("enabled modules ({}):", origin);
        for m in modules {
            println!("  {} {}", pad_to_width(&m.key, 12), m.label);
        }
    }
    Ok(())
}

fn cmd_favorites(
    ctx: &SessionContext,
    path: &str,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let loaded = prefs::Preferences::load(&ctx.store);
    let items = project_favorites(&ctx.registry, &loaded.favorites);

    if json {
        let out: Vec<ItemJson> = items
            .iter()
            .map(|i| ItemJson {
                label: i.label.clone(),
                href: i.href.clone(),
                active: is_active(path, &i.href),
                starred: true,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if items.is_empty() {
        println!("no favorites");
    } else {
        for item in items {
            let marker = if is_active(path, &item.href) { " *" } else { "" };
            println!("{}  {}{}", item.label, item.href, marker);
        }
    }
    Ok(())
}

fn cmd_active(
    ctx: &SessionContext,
    route: &str,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let sidebar = Sidebar::new(
        ctx.registry.clone(),
        Box::new(prefs::MemoryPreferenceStore::new()),
        ctx.fallback(),
        route,
    );
    let trail = sidebar.active_trail();
    let href = ctx
        .registry
        .modules
        .iter()
        .filter_map(|m| active_leaf(route, m))
        .max_by_key(|leaf| leaf.href.len())
        .map(|leaf| leaf.href.clone());

    if json {
        let out = ActiveJson {
            path: route.to_string(),
            trail,
            href,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        match href {
            Some(href) => println!("{}  {}", trail.join(" \u{203A} "), href),
            None => println!("no menu entry for {}", route),
        }
    }
    Ok(())
}

fn cmd_validate(ctx: &SessionContext, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let registry = &ctx.registry;
    let mut warnings = Vec::new();

    for key in &ctx.config.enablement.fallback {
        if registry.module(key).is_none() {
            warnings.push(format!("fallback module '{}' is not in the menu", key));
        }
    }

    let loaded = prefs::Preferences::load(&ctx.store);
    if let Some(order) = &loaded.module_order {
        for key in order {
            if registry.module(key).is_none() {
                warnings.push(format!("saved module order names unknown module '{}'", key));
            }
        }
    }
    if let Some(groups) = &loaded.group_item_order {
        for (group_key, hrefs) in groups {
            match registry.group(group_key) {
                None => warnings.push(format!("saved item order names unknown group '{}'", group_key)),
                Some(group) => {
                    for href in hrefs {
                        if !group.items.iter().any(|i| &i.href == href) {
                            warnings.push(format!(
                                "saved item order for '{}' names unknown item {}",
                                group_key, href
                            ));
                        }
                    }
                }
            }
        }
    }
    for href in loaded.favorites.starred_hrefs() {
        if registry.find_leaf(&href).is_none() {
            warnings.push(format!("favorite {} is not in the menu", href));
        }
    }

    let groups = registry.modules.iter().map(|m| m.groups.len()).sum();
    let leaves = registry.leaves().count();

    if json {
        let out = ValidateJson {
            valid: true,
            modules: registry.modules.len(),
            groups,
            leaves,
            warnings,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!(
            "ok: {} modules, {} groups, {} pages",
            registry.modules.len(),
            groups,
            leaves
        );
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in &warnings {
                println!("  {}", w);
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_star(ctx: &SessionContext, href: &str, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if ctx.registry.find_leaf(href).is_none() {
        return Err(format!("no menu entry with href {}", href).into());
    }
    let mut sidebar = mounted_sidebar(ctx, "/");
    let starred = sidebar.toggle_star(href)?.unwrap_or(false);

    if json {
        let out = serde_json::json!({ "href": href, "starred": starred });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if starred {
        println!("starred {}", href);
    } else {
        println!("unstarred {}", href);
    }
    Ok(())
}
