use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "navtree", about = concat!("navtree v", env!("CARGO_PKG_VERSION"), " - back-office sidebar navigation"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Read config and preferences from a different directory
    #[arg(long = "config-dir", global = true)]
    pub config_dir: Option<PathBuf>,

    /// Menu registry file (defaults to <config-dir>/menu.toml, then the built-in menu)
    #[arg(long, global = true)]
    pub menu: Option<PathBuf>,

    /// Current route, for active highlighting
    #[arg(long, global = true)]
    pub path: Option<String>,

    /// Keep preference changes in memory (TUI only)
    #[arg(long)]
    pub ephemeral: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the effective navigation tree
    Tree(TreeArgs),
    /// List visible modules and where the enabled set came from
    Modules,
    /// Show or change saved orderings
    Order(OrderCmd),
    /// Star or unstar a page (toggle)
    Star(StarArgs),
    /// List starred pages
    Favorites,
    /// Show the menu trail for a route
    Active(ActiveArgs),
    /// Validate the menu registry and saved preferences
    Validate,
}

#[derive(Args)]
pub struct TreeArgs {
    /// Only expand the module and group holding the current route
    #[arg(long)]
    pub collapsed: bool,
}

#[derive(Args)]
pub struct OrderCmd {
    #[command(subcommand)]
    pub action: OrderAction,
}

#[derive(Subcommand)]
pub enum OrderAction {
    /// Print the effective module and group item orders
    Show,
    /// Move a module to the position of another
    Module(OrderModuleArgs),
    /// Move an item to the position of another item in the same group
    Item(OrderItemArgs),
    /// Forget saved orderings (favorites are kept)
    Reset,
}

#[derive(Args)]
pub struct OrderModuleArgs {
    /// Module key to move
    pub moved: String,
    /// Module key whose position it takes
    pub target: String,
}

#[derive(Args)]
pub struct OrderItemArgs {
    /// Group key
    pub group: String,
    /// Href of the item to move
    pub moved: String,
    /// Href of the item whose position it takes
    pub target: String,
}

#[derive(Args)]
pub struct StarArgs {
    /// Href of the page
    pub href: String,
}

#[derive(Args)]
pub struct ActiveArgs {
    /// Route to resolve (defaults to --path, then the configured start path)
    pub route: Option<String>,
}
