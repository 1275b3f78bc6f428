use crate::cli::commands::{OrderAction, OrderItemArgs, OrderModuleArgs};
use crate::cli::output::OrderJson;
use crate::io::prefs::{ORDER_KEYS, clear_records};
use crate::io::session::SessionContext;
use crate::tui::sidebar::{RowKind, Sidebar};

use super::mounted_sidebar;

pub(super) fn cmd_order(
    ctx: &SessionContext,
    action: OrderAction,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        OrderAction::Show => cmd_order_show(ctx, json),
        OrderAction::Module(args) => cmd_order_module(ctx, args),
        OrderAction::Item(args) => cmd_order_item(ctx, args),
        OrderAction::Reset => {
            clear_records(&ctx.store, &ORDER_KEYS)?;
            println!("saved orderings cleared");
            Ok(())
        }
    }
}

fn cmd_order_show(ctx: &SessionContext, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let sidebar = mounted_sidebar(ctx, "/");
    let out = OrderJson {
        modules: sidebar.effective_module_keys(),
        groups: sidebar.effective_group_orders(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("modules: {}", out.modules.join(", "));
        for (group, hrefs) in &out.groups {
            println!("{}:", group);
            for href in hrefs {
                println!("  {}", href);
            }
        }
    }
    Ok(())
}

/// One drag: pick up `moved`, drop on `target`, persist once.
fn drag_and_drop(
    sidebar: &mut Sidebar,
    moved: RowKind,
    target: RowKind,
) -> Result<bool, Box<dyn std::error::Error>> {
    if !sidebar.begin_drag(&moved) {
        return Err("sidebar is not interactive".into());
    }
    sidebar.hover_drag(&target);
    Ok(sidebar.end_drag()?)
}

fn report(changed: bool, moved: &str, target: &str) {
    if changed {
        println!("moved {} to the position of {}", moved, target);
    } else {
        println!("order unchanged");
    }
}

fn cmd_order_module(
    ctx: &SessionContext,
    args: OrderModuleArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut sidebar = mounted_sidebar(ctx, "/");
    let visible = sidebar.effective_module_keys();
    for key in [&args.moved, &args.target] {
        if !visible.contains(key) {
            log::warn!("module '{}' is not visible", key);
        }
    }

    let changed = drag_and_drop(
        &mut sidebar,
        RowKind::Module {
            key: args.moved.clone(),
        },
        RowKind::Module {
            key: args.target.clone(),
        },
    )?;
    report(changed, &args.moved, &args.target);
    Ok(())
}

fn cmd_order_item(
    ctx: &SessionContext,
    args: OrderItemArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    match ctx.registry.group(&args.group) {
        None => log::warn!("unknown group '{}'", args.group),
        Some(group) => {
            for href in [&args.moved, &args.target] {
                if !group.items.iter().any(|i| &i.href == href) {
                    log::warn!("'{}' is not an item of group '{}'", href, args.group);
                }
            }
        }
    }

    let mut sidebar = mounted_sidebar(ctx, "/");
    let item = |href: &str| RowKind::Item {
        group: args.group.clone(),
        href: href.to_string(),
    };
    let changed = drag_and_drop(&mut sidebar, item(&args.moved), item(&args.target))?;
    report(changed, &args.moved, &args.target);
    Ok(())
}
